#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::executor::LocalPool;
    use futures::task::LocalSpawnExt;
    use pollster::block_on;

    use crate::provider::ProviderChain;
    use crate::registry::Registry;
    use crate::store::{Store, Subscription};
    use crate::stores;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        value: i32,
    }

    #[test]
    fn test_store_read_and_set_state() {
        let store = Store::new(Counter { value: 42 });
        assert_eq!(store.read().value, 42);
        assert_eq!(store.with(|c| c.value), 42);

        block_on(store.set_state(|c| Counter { value: c.value + 1 })).unwrap();
        assert_eq!(store.read().value, 43);

        block_on(store.mutate(|c| {
            std::future::ready(Ok::<_, std::convert::Infallible>(Counter { value: c.value + 1 }))
        }))
        .unwrap();
        assert_eq!(store.read().value, 44);
    }

    #[test]
    fn test_identity_mutation_notifies_every_observer_once() {
        let store = Store::new(Counter { value: 7 });
        let first = Rc::new(RefCell::new(0));
        let second = Rc::new(RefCell::new(0));

        let first_clone = first.clone();
        let _a = store.subscribe(move || *first_clone.borrow_mut() += 1);
        let second_clone = second.clone();
        let _b = store.subscribe(move || *second_clone.borrow_mut() += 1);

        block_on(store.set_state(|c| c.clone())).unwrap();

        assert_eq!(store.read().value, 7);
        assert_eq!(*first.borrow(), 1);
        assert_eq!(*second.borrow(), 1);
    }

    #[test]
    fn test_failed_mutation_is_atomic() {
        let store = Store::new(Counter { value: 42 });
        let called = Rc::new(RefCell::new(false));

        let called_clone = called.clone();
        let _sub = store.subscribe(move || *called_clone.borrow_mut() = true);

        let err = block_on(store.mutate(|_| std::future::ready(Err::<Counter, &str>("boom"))))
            .unwrap_err();

        assert!(format!("{err}").contains("boom"));
        assert_eq!(store.read().value, 42);
        assert!(!*called.borrow());
    }

    #[test]
    fn test_subscription_accounting() {
        let store = Store::new(Counter { value: 0 });
        assert_eq!(store.observer_count(), 0);

        let a = store.subscribe(|| {});
        let b = store.subscribe(|| {});
        assert_eq!(store.observer_count(), 2);

        assert!(a.is_active());
        a.cancel();
        assert!(!a.is_active());
        assert_eq!(store.observer_count(), 1);

        // second cancel is a no-op
        a.cancel();
        assert_eq!(store.observer_count(), 1);

        b.cancel();
        assert_eq!(store.observer_count(), 0);
    }

    #[test]
    fn test_subscribe_during_notification_skips_current_pass() {
        let store = Store::new(Counter { value: 0 });
        let late_calls = Rc::new(RefCell::new(0));
        let late_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let store_clone = store.clone();
        let late_calls_clone = late_calls.clone();
        let late_sub_clone = late_sub.clone();
        let _a = store.subscribe(move || {
            if late_sub_clone.borrow().is_none() {
                let late_calls = late_calls_clone.clone();
                let sub = store_clone.subscribe(move || *late_calls.borrow_mut() += 1);
                *late_sub_clone.borrow_mut() = Some(sub);
            }
        });

        block_on(store.set_state(|c| c.clone())).unwrap();
        assert_eq!(*late_calls.borrow(), 0);

        block_on(store.set_state(|c| c.clone())).unwrap();
        assert_eq!(*late_calls.borrow(), 1);
    }

    #[test]
    fn test_cancel_during_notification_finishes_current_pass() {
        let store = Store::new(Counter { value: 0 });
        let victim_calls = Rc::new(RefCell::new(0));
        let victim_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let victim_sub_clone = victim_sub.clone();
        let _a = store.subscribe(move || {
            if let Some(sub) = victim_sub_clone.borrow().as_ref() {
                sub.cancel();
            }
        });
        let victim_calls_clone = victim_calls.clone();
        *victim_sub.borrow_mut() =
            Some(store.subscribe(move || *victim_calls_clone.borrow_mut() += 1));

        // victim was already in the snapshot for this pass
        block_on(store.set_state(|c| c.clone())).unwrap();
        assert_eq!(*victim_calls.borrow(), 1);
        assert_eq!(store.observer_count(), 1);

        // and is gone for the next one
        block_on(store.set_state(|c| c.clone())).unwrap();
        assert_eq!(*victim_calls.borrow(), 1);
    }

    #[test]
    fn test_mutations_compose_in_call_order() {
        let store = Store::new(1i32);
        let (tx, rx) = futures::channel::oneshot::channel::<()>();
        let mut pool = LocalPool::new();
        let spawner = pool.spawner();

        let slow = store.clone();
        spawner
            .spawn_local(async move {
                slow.mutate(|v| async move {
                    rx.await.ok();
                    Ok::<_, std::convert::Infallible>(v * 10)
                })
                .await
                .unwrap();
            })
            .unwrap();

        let fast = store.clone();
        spawner
            .spawn_local(async move {
                fast.set_state(|v| v + 1).await.unwrap();
            })
            .unwrap();

        // the first mutation is suspended inside its updater; the second is
        // queued behind it rather than jumping ahead
        pool.run_until_stalled();
        assert_eq!(store.read(), 1);

        tx.send(()).unwrap();
        pool.run();
        assert_eq!(store.read(), 11);
    }

    #[test]
    fn test_notification_precedes_next_mutation() {
        let store = Store::new(0i32);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let store_clone = store.clone();
        let seen_clone = seen.clone();
        let _sub = store.subscribe(move || seen_clone.borrow_mut().push(store_clone.read()));

        let mut pool = LocalPool::new();
        let spawner = pool.spawner();
        for _ in 0..2 {
            let store = store.clone();
            spawner
                .spawn_local(async move {
                    store.set_state(|v| v + 1).await.unwrap();
                })
                .unwrap();
        }
        pool.run();

        // each mutation's observers saw its result before the next applied
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_registry_rejects_duplicate_type() {
        let a = Store::new(Counter { value: 1 });
        let b = Store::new(Counter { value: 2 });

        let err = Registry::new(stores![a, b]).err().unwrap();
        assert!(err.type_name().contains("Counter"));
    }

    #[test]
    fn test_registry_lookup() {
        let store = Store::new(Counter { value: 5 });
        let registry = Registry::new(stores![store.clone()]).unwrap();
        assert_eq!(registry.len(), 1);

        let found = registry.lookup::<Counter>().unwrap();
        assert_eq!(found.read().value, 5);

        assert!(registry.lookup::<i32>().is_err());
        assert!(Registry::empty().is_empty());
    }

    #[test]
    fn test_chain_resolves_nearest_registry() {
        let outer_store = Store::new(Counter { value: 1 });
        let inner_store = Store::new(Counter { value: 2 });

        let outer = ProviderChain::root()
            .extend(Registry::new(stores![outer_store.clone()]).unwrap());
        let inner = outer.extend(Registry::new(stores![inner_store.clone()]).unwrap());
        assert_eq!(outer.depth(), 1);
        assert_eq!(inner.depth(), 2);

        assert_eq!(outer.resolve::<Counter>().unwrap().read().value, 1);
        // nearest registry shadows the outer one
        assert_eq!(inner.resolve::<Counter>().unwrap().read().value, 2);
    }

    #[test]
    fn test_resolution_failure_names_the_type() {
        let empty_chain = ProviderChain::root();
        let err = empty_chain.resolve::<Counter>().err().unwrap();
        assert!(err.type_name().contains("Counter"));

        // a registry in scope that lacks the type fails the same way
        let chain = ProviderChain::root().extend(Registry::empty());
        assert!(chain.resolve::<Counter>().is_err());
    }
}
