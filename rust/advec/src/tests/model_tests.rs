use advec_testkit::ops::{ArrayOp, random_ops};
use advec_testkit::tracked::{self, Tracked};

use crate::DynArray;

fn apply(a: &mut DynArray<i64>, model: &mut Vec<i64>, op: ArrayOp) {
    match op {
        ArrayOp::Push(value) => {
            a.push(value);
            model.push(value);
        }
        ArrayOp::Insert { index, value } => {
            assert_eq!(*a.insert(index, value), value);
            model.insert(index, value);
        }
        ArrayOp::Erase(index) => {
            assert_eq!(a.erase(index), index);
            model.remove(index);
        }
        ArrayOp::PopBack => {
            a.pop_back();
            model.pop();
        }
        ArrayOp::Resize(len) => {
            a.resize(len);
            model.resize(len, 0);
        }
        ArrayOp::Truncate(len) => {
            a.truncate(len);
            model.truncate(len);
        }
        ArrayOp::Reserve(capacity) => {
            let before = a.capacity();
            a.reserve(capacity);
            assert_eq!(a.capacity(), before.max(capacity));
        }
        ArrayOp::Clear => {
            a.clear();
            model.clear();
        }
    }
}

#[test]
fn test_random_ops_match_vec() {
    let mut rng = fastrand::Rng::with_seed(0x5eed_a11c);
    for _ in 0..20 {
        let ops = random_ops(&mut rng, 500, 64);
        let mut a = DynArray::new();
        let mut model = Vec::new();
        for op in ops {
            let capacity = a.capacity();
            apply(&mut a, &mut model, op);
            assert!(a.len() <= a.capacity(), "{op:?}");
            assert!(a.capacity() >= capacity, "capacity shrank on {op:?}");
            assert_eq!(a.as_slice(), model.as_slice(), "{op:?}");
        }
    }
}

#[test]
fn test_clones_stay_independent_under_random_ops() {
    let mut rng = fastrand::Rng::with_seed(27);
    let ops = random_ops(&mut rng, 1000, 32);
    let mut a = DynArray::new();
    let mut model = Vec::new();
    let mut snapshots = Vec::new();

    for (i, op) in ops.into_iter().enumerate() {
        apply(&mut a, &mut model, op);
        if i % 50 == 0 {
            snapshots.push((a.clone(), model.clone()));
        }
        if i % 75 == 0 {
            let mut target = DynArray::from_fn(rng.usize(0..40), |j| j as i64);
            target.clone_from(&a);
            assert_eq!(target, a);
        }
    }

    for (copy, expected) in &snapshots {
        assert_eq!(copy.as_slice(), expected.as_slice());
        assert_eq!(copy.capacity(), expected.len());
    }
}

#[test]
fn test_random_ops_balance_constructions_and_drops() {
    tracked::reset();
    let mut rng = fastrand::Rng::with_seed(991);
    let mut a = DynArray::<Tracked>::new();
    for op in random_ops(&mut rng, 2000, 48) {
        match op {
            ArrayOp::Push(value) => a.push(Tracked::new(value)),
            ArrayOp::Insert { index, value } => {
                a.insert(index, Tracked::new(value));
            }
            ArrayOp::Erase(index) => {
                a.erase(index);
            }
            ArrayOp::PopBack => a.pop_back(),
            ArrayOp::Resize(len) => a.resize(len),
            ArrayOp::Truncate(len) => a.truncate(len),
            ArrayOp::Reserve(capacity) => a.reserve(capacity),
            ArrayOp::Clear => a.clear(),
        }
        assert_eq!(tracked::live(), a.len() as isize, "{op:?}");
    }
    drop(a);
    assert_eq!(tracked::live(), 0);
}
