use std::panic::{AssertUnwindSafe, catch_unwind};

use advec_testkit::tracked::{self, Tracked};

use crate::DynArray;

fn tracked_array(values: &[i64], capacity: usize) -> DynArray<Tracked> {
    let mut a = DynArray::with_capacity(capacity);
    a.extend(values.iter().copied().map(Tracked::new));
    a
}

#[test]
fn test_clone_panic_does_not_leak() {
    tracked::reset();
    let a = tracked_array(&[1, 2, 3, 4, 5], 5);
    tracked::panic_after_clones(3);
    let res = catch_unwind(AssertUnwindSafe(|| a.clone()));
    assert!(res.is_err());
    // The three clones made before the failure were dropped again.
    assert_eq!(tracked::live(), 5);
    assert_eq!(tracked::values(&a), [1, 2, 3, 4, 5]);
}

#[test]
fn test_with_len_default_panic_does_not_leak() {
    tracked::reset();
    tracked::panic_after_defaults(4);
    let res = catch_unwind(|| DynArray::<Tracked>::with_len(10));
    assert!(res.is_err());
    assert_eq!(tracked::snapshot().constructed, 4);
    assert_eq!(tracked::live(), 0);
}

#[test]
fn test_emplace_back_panic_on_full_array_leaves_it_unchanged() {
    tracked::reset();
    let mut a = tracked_array(&[1, 2, 3, 4], 4);
    let ptr = a.as_ptr();

    let res = catch_unwind(AssertUnwindSafe(|| {
        a.emplace_back(|| panic!("constructor failed"));
    }));
    assert!(res.is_err());
    assert_eq!(tracked::values(&a), [1, 2, 3, 4]);
    assert_eq!(a.capacity(), 4);
    assert_eq!(a.as_ptr(), ptr);
    assert_eq!(tracked::live(), 4);

    // Still usable afterwards.
    a.push(Tracked::new(5));
    assert_eq!(tracked::values(&a), [1, 2, 3, 4, 5]);
}

#[test]
fn test_emplace_back_panic_with_spare_capacity() {
    tracked::reset();
    let mut a = tracked_array(&[1, 2], 4);
    let res = catch_unwind(AssertUnwindSafe(|| {
        a.emplace_back(|| panic!("constructor failed"));
    }));
    assert!(res.is_err());
    assert_eq!(tracked::values(&a), [1, 2]);
    assert_eq!(a.capacity(), 4);
    assert_eq!(tracked::live(), 2);
}

#[test]
fn test_emplace_panic_leaves_array_unchanged() {
    tracked::reset();
    for capacity in [4, 8] {
        let mut a = tracked_array(&[1, 2, 3, 4], capacity);
        let ptr = a.as_ptr();
        for index in 0..4 {
            let res = catch_unwind(AssertUnwindSafe(|| {
                a.emplace(index, || panic!("constructor failed"));
            }));
            assert!(res.is_err());
            assert_eq!(tracked::values(&a), [1, 2, 3, 4]);
            assert_eq!(a.capacity(), capacity);
            assert_eq!(a.as_ptr(), ptr);
        }
    }
    assert_eq!(tracked::live(), 0);
}

#[test]
fn test_clone_from_into_smaller_array_is_all_or_nothing() {
    tracked::reset();
    let mut dst = tracked_array(&[7, 8], 2);
    let src = tracked_array(&[1, 2, 3, 4, 5], 5);
    let ptr = dst.as_ptr();

    tracked::panic_after_clones(2);
    let res = catch_unwind(AssertUnwindSafe(|| dst.clone_from(&src)));
    assert!(res.is_err());
    assert_eq!(tracked::values(&dst), [7, 8]);
    assert_eq!(dst.as_ptr(), ptr);
    assert_eq!(tracked::live(), 7);
}

#[test]
fn test_clone_from_reusing_storage_keeps_len_consistent() {
    tracked::reset();
    let mut dst = tracked_array(&[7, 8], 8);
    let src = tracked_array(&[1, 2, 3, 4, 5], 5);

    // Two prefix assignments and one tail clone succeed.
    tracked::panic_after_clones(3);
    let res = catch_unwind(AssertUnwindSafe(|| dst.clone_from(&src)));
    assert!(res.is_err());
    assert_eq!(tracked::values(&dst), [1, 2, 3]);
    assert_eq!(tracked::live(), 3 + 5);

    drop((dst, src));
    assert_eq!(tracked::live(), 0);
}

#[test]
fn test_resize_panic_keeps_appended_elements() {
    tracked::reset();
    let mut a = tracked_array(&[1], 1);
    tracked::panic_after_defaults(2);
    let res = catch_unwind(AssertUnwindSafe(|| a.resize(6)));
    assert!(res.is_err());
    assert_eq!(tracked::values(&a), [1, 0, 0]);
    assert_eq!(a.capacity(), 6);
    assert_eq!(tracked::live(), 3);
}

#[test]
fn test_panicking_drop_in_truncate_is_not_repeated() {
    use std::cell::Cell;

    thread_local! {
        static DROPS: Cell<usize> = const { Cell::new(0) };
    }

    struct Bomb(bool);

    impl Drop for Bomb {
        fn drop(&mut self) {
            DROPS.with(|d| d.set(d.get() + 1));
            if self.0 {
                panic!("drop failed");
            }
        }
    }

    let mut a = DynArray::new();
    a.extend([Bomb(false), Bomb(true), Bomb(false)]);
    let res = catch_unwind(AssertUnwindSafe(|| a.truncate(0)));
    assert!(res.is_err());
    assert!(a.is_empty());
    // Every element was dropped exactly once, including the one after the
    // panicking destructor.
    assert_eq!(DROPS.with(Cell::get), 3);
    drop(a);
    assert_eq!(DROPS.with(Cell::get), 3);
}
