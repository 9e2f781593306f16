//! Random operation sequences for model-based tests of sequence containers.
//!
//! The generator keeps track of the length the container will have after each
//! operation, so every generated index is in range when the ops are applied in
//! order to an initially empty container.

/// One mutation of a sequence container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayOp {
    Push(i64),
    Insert { index: usize, value: i64 },
    Erase(usize),
    PopBack,
    Resize(usize),
    Truncate(usize),
    /// Absolute capacity target.
    Reserve(usize),
    Clear,
}

impl ArrayOp {
    /// Length of the container after applying this op to one of length `len`.
    pub fn apply_len(&self, len: usize) -> usize {
        match *self {
            ArrayOp::Push(_) | ArrayOp::Insert { .. } => len + 1,
            ArrayOp::Erase(_) | ArrayOp::PopBack => len - 1,
            ArrayOp::Resize(n) => n,
            ArrayOp::Truncate(n) => n.min(len),
            ArrayOp::Reserve(_) => len,
            ArrayOp::Clear => 0,
        }
    }
}

/// Generates `count` valid ops starting from an empty container, never
/// letting the length exceed `max_len`.
pub fn random_ops(rng: &mut fastrand::Rng, count: usize, max_len: usize) -> Vec<ArrayOp> {
    assert_ne!(max_len, 0);
    let mut len = 0usize;
    let mut ops = Vec::with_capacity(count);
    while ops.len() < count {
        let op = match rng.u32(0..100) {
            0..35 if len < max_len => ArrayOp::Push(rng.i64(-1000..1000)),
            35..55 if len < max_len => ArrayOp::Insert {
                index: rng.usize(0..=len),
                value: rng.i64(-1000..1000),
            },
            55..70 if len > 0 => ArrayOp::Erase(rng.usize(0..len)),
            70..78 if len > 0 => ArrayOp::PopBack,
            78..86 => ArrayOp::Resize(rng.usize(0..=max_len)),
            86..91 => ArrayOp::Truncate(rng.usize(0..=max_len)),
            91..97 => ArrayOp::Reserve(rng.usize(0..=max_len * 2)),
            97..100 => ArrayOp::Clear,
            _ => continue,
        };
        len = op.apply_len(len);
        ops.push(op);
    }
    ops
}
