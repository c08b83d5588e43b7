use rand::Rng;
use spotfinder_int_test::test_util::{
    cleanup, create_test_context, ids, run_test, CENTER_LATITUDE, CENTER_LONGITUDE,
};
use std::sync::{Arc, Barrier};
use std::thread;

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_concurrent_searches() {
    run_test(
        create_test_context,
        |ctx| {
            let finder = ctx.finder();
            let expected = ids(&finder.search(CENTER_LATITUDE, CENTER_LONGITUDE, 500.0, "circle")?);

            let num_threads = 8;
            let searches_per_thread = 25;
            let barrier = Arc::new(Barrier::new(num_threads));

            let mut handles = vec![];
            for _ in 0..num_threads {
                let finder = finder.clone();
                let barrier = Arc::clone(&barrier);
                let expected = expected.clone();

                handles.push(thread::spawn(move || {
                    barrier.wait();
                    for _ in 0..searches_per_thread {
                        let result = finder
                            .search(CENTER_LATITUDE, CENTER_LONGITUDE, 500.0, "circle")
                            .expect("search succeeds");
                        assert_eq!(ids(&result), expected);
                    }
                }));
            }

            for handle in handles {
                handle.join().expect("search thread panicked");
            }

            assert_eq!(ctx.store().open_sessions(), 0);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_concurrent_mixed_requests() {
    run_test(
        create_test_context,
        |ctx| {
            let num_threads = 6;
            let mut handles = vec![];

            for thread_id in 0..num_threads {
                let finder = ctx.finder();
                handles.push(thread::spawn(move || {
                    let mut rng = rand::thread_rng();
                    for _ in 0..20 {
                        let radius: f64 = rng.gen_range(-50.0..600.0);
                        let shape = if thread_id % 2 == 0 { "circle" } else { "square" };
                        match finder.search(CENTER_LATITUDE, CENTER_LONGITUDE, radius, shape) {
                            Ok(result) => assert!(radius > 0.0 && result.len() <= 6),
                            Err(e) => assert!(radius <= 0.0 && e.is_validation()),
                        }
                    }
                }));
            }

            for handle in handles {
                handle.join().expect("search thread panicked");
            }

            assert_eq!(ctx.store().open_sessions(), 0);
            Ok(())
        },
        cleanup,
    )
}
