#![no_main]

use bitmap_tree::{visitor::WellFormedChecker, BitmapTree, TreeError};
use libfuzzer_sys::arbitrary::{self, Arbitrary};
use std::collections::BTreeSet;

#[derive(Arbitrary, Debug, Clone, Copy)]
enum Index {
    /// Near the start, where allocations cluster
    Low(u16),
    /// Anywhere, forcing deep growth
    Any(u64),
}

impl Index {
    fn get(self) -> u64 {
        match self {
            Index::Low(idx) => u64::from(idx),
            Index::Any(idx) => idx,
        }
    }
}

#[derive(Arbitrary, Debug)]
enum Action {
    Allocate,
    AllocateAt(Index),
    Deallocate(Index),
    IsAllocated(Index),
    CheckLen,
    Clone,
}

#[derive(Arbitrary, Debug)]
struct Input {
    limit: Option<u16>,
    actions: Vec<Action>,
}

libfuzzer_sys::fuzz_target!(|input: Input| {
    let mut tree = match input.limit {
        Some(limit) => BitmapTree::<u8>::with_limit(u64::from(limit)),
        None => BitmapTree::<u8>::with_word(),
    };
    let limit = tree.limit();
    let mut oracle = BTreeSet::<u64>::new();

    for action in input.actions {
        match action {
            Action::Allocate => {
                let expected = (0..).find(|idx| !oracle.contains(idx)).unwrap();
                match tree.allocate() {
                    Ok(idx) => {
                        assert_eq!(idx, expected);
                        oracle.insert(idx);
                    },
                    Err(TreeError::CapacityExhausted { .. }) => {
                        assert!(u128::from(expected) >= limit);
                    },
                    Err(err) => panic!("unexpected error: {err}"),
                }
            },
            Action::AllocateAt(idx) => {
                let idx = idx.get();
                match tree.try_allocate_at(idx) {
                    Ok(()) => {
                        oracle.insert(idx);
                    },
                    Err(TreeError::IndexOutOfRange { .. }) => {
                        assert!(u128::from(idx) >= limit);
                    },
                    Err(err) => panic!("unexpected error: {err}"),
                }
            },
            Action::Deallocate(idx) => {
                let idx = idx.get();
                tree.deallocate(idx);
                oracle.remove(&idx);
            },
            Action::IsAllocated(idx) => {
                let idx = idx.get();
                assert_eq!(tree.is_allocated(idx), oracle.contains(&idx));
            },
            Action::CheckLen => {
                assert_eq!(tree.len(), oracle.len() as u64);
                assert_eq!(tree.is_empty(), oracle.is_empty());
            },
            Action::Clone => {
                tree = tree.clone();
            },
        }
    }

    let _ = WellFormedChecker::check(&tree).unwrap();
    for idx in &oracle {
        assert!(tree.is_allocated(*idx));
    }
});
