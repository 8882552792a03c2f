use pollster::block_on;
use trellis_core::prelude::*;

#[derive(Clone)]
struct Counter {
    value: i32,
}

struct CounterView {
    binding: Option<StoreBinding<Counter>>,
}

impl Component for CounterView {
    fn mount(&mut self, cx: &mut MountCx<'_>) -> Result<(), NoProviderFound> {
        self.binding = Some(cx.bind::<Counter>()?);
        Ok(())
    }

    fn view(&self) -> String {
        match &self.binding {
            Some(binding) => format!("Count: {}", binding.read().value),
            None => String::new(),
        }
    }

    fn unmount(&mut self) {
        if let Some(binding) = self.binding.take() {
            binding.unmount();
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let counter = Store::new(Counter { value: 0 });
    let tree = Node::provide(
        stores![counter.clone()],
        vec![Node::component(CounterView { binding: None })],
    )?;

    let mut host = Host::new();
    host.mount(tree)?;
    let id = host.component_ids()[0];
    println!("{}", host.view_of(id).unwrap_or_default());

    for _ in 0..3 {
        block_on(counter.set_state(|c| Counter { value: c.value + 1 }))?;
        host.render_frame();
        println!("{}", host.view_of(id).unwrap_or_default());
    }

    host.unmount();
    log::info!("observers after unmount: {}", counter.observer_count());
    Ok(())
}
