//! Concurrent resolver use
//!
//! A resolver holds no mutable state, so a single instance shared across
//! threads must give every thread the same answers a sequential run gives.

use crate::test_utils::{algorithm_shapes, init_tracing, secondary_shapes, OPERATIONS};
use std::sync::Arc;
use std::thread;
use subtlecaps_core::ResolverPolicy;
use subtlecaps_crypto::{default_resolver, CapabilityResolver};

const THREADS: usize = 8;

fn answers(resolver: &CapabilityResolver) -> Vec<bool> {
    let mut out = Vec::new();
    for operation in OPERATIONS {
        for algorithm in algorithm_shapes() {
            for secondary in secondary_shapes() {
                out.push(resolver.supports_json(operation, &algorithm, secondary.as_ref()));
            }
        }
    }
    out
}

#[test]
fn test_shared_default_resolver_across_threads() {
    init_tracing();

    let expected = answers(default_resolver());

    let results: Vec<Vec<bool>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| scope.spawn(|| answers(default_resolver())))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("query thread panicked"))
            .collect()
    });

    assert_eq!(results.len(), THREADS);
    for result in results {
        assert_eq!(result, expected);
    }
}

#[test]
fn test_arc_shared_custom_resolver() {
    let resolver = Arc::new(CapabilityResolver::new(ResolverPolicy {
        allow_sha1: false,
        min_pbkdf2_iterations: 10_000,
        min_rsa_modulus_length: 2048,
    }));
    let expected = answers(&resolver);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            thread::spawn(move || answers(&resolver))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().expect("query thread panicked"), expected);
    }
}
