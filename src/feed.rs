// SPDX-License-Identifier: AGPL-3.0-only

//! Tensor slots and feed maps: the boundary between batch encoders and the
//! downstream computation graph.
//!
//! The Python control stack represents tensor inputs as symbolic placeholder
//! objects; here they become plain typed descriptors ([`TensorSpec`]: name,
//! dtype, shape with batch-dependent dims left open) plus concrete flat
//! row-major arrays ([`ArrayF64`], [`ArrayI32`]). A [`FeedMap`] is an
//! insertion-ordered mapping from slot name to tensor; merging several maps
//! follows last-write-wins on key collision, with the colliding key keeping
//! its original position (Python `dict.update` semantics). Encoders
//! namespace their slot names per instance, so collisions only happen when
//! two components are configured to share a name on purpose.

use std::fmt;

/// Element type of a tensor slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    /// 64-bit float (features, masks, expanded distances).
    F64,
    /// 32-bit signed integer (indices, slices, membership, atomic numbers).
    I32,
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::F64 => write!(f, "f64"),
            Self::I32 => write!(f, "i32"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Flat row-major arrays
// ═══════════════════════════════════════════════════════════════════

/// Dense f64 tensor, flat row-major storage with explicit shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayF64 {
    shape: Vec<usize>,
    data: Vec<f64>,
}

/// Dense i32 tensor, flat row-major storage with explicit shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayI32 {
    shape: Vec<usize>,
    data: Vec<i32>,
}

fn shape_len(shape: &[usize]) -> usize {
    shape.iter().product()
}

fn flat_offset(shape: &[usize], idx: &[usize]) -> usize {
    debug_assert_eq!(idx.len(), shape.len(), "index rank mismatch");
    let mut off = 0;
    for (d, (&i, &n)) in idx.iter().zip(shape.iter()).enumerate() {
        debug_assert!(i < n, "index {i} out of bounds for dim {d} (size {n})");
        off = off * n + i;
    }
    off
}

impl ArrayF64 {
    /// All-zero tensor of the given shape.
    #[must_use]
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: vec![0.0; shape_len(shape)],
            shape: shape.to_vec(),
        }
    }

    /// Wrap an existing flat buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of `shape`.
    #[must_use]
    pub fn from_vec(shape: &[usize], data: Vec<f64>) -> Self {
        assert_eq!(
            data.len(),
            shape_len(shape),
            "flat length must match shape product"
        );
        Self {
            shape: shape.to_vec(),
            data,
        }
    }

    /// Tensor shape (row-major).
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Flat row-major view of the data.
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat view (callers keep the shape fixed).
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Element at a multi-dimensional index.
    #[must_use]
    pub fn at(&self, idx: &[usize]) -> f64 {
        self.data[flat_offset(&self.shape, idx)]
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the tensor holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ArrayI32 {
    /// All-zero tensor of the given shape.
    #[must_use]
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: vec![0; shape_len(shape)],
            shape: shape.to_vec(),
        }
    }

    /// Wrap an existing flat buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not equal the product of `shape`.
    #[must_use]
    pub fn from_vec(shape: &[usize], data: Vec<i32>) -> Self {
        assert_eq!(
            data.len(),
            shape_len(shape),
            "flat length must match shape product"
        );
        Self {
            shape: shape.to_vec(),
            data,
        }
    }

    /// Tensor shape (row-major).
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Flat row-major view of the data.
    #[must_use]
    pub fn data(&self) -> &[i32] {
        &self.data
    }

    /// Mutable flat view (callers keep the shape fixed).
    pub fn data_mut(&mut self) -> &mut [i32] {
        &mut self.data
    }

    /// Element at a multi-dimensional index.
    #[must_use]
    pub fn at(&self, idx: &[usize]) -> i32 {
        self.data[flat_offset(&self.shape, idx)]
    }

    /// Total number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the tensor holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A concrete tensor value bound to a feed slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Tensor {
    /// f64 payload.
    F64(ArrayF64),
    /// i32 payload.
    I32(ArrayI32),
}

impl Tensor {
    /// Element type of the payload.
    #[must_use]
    pub fn dtype(&self) -> Dtype {
        match self {
            Self::F64(_) => Dtype::F64,
            Self::I32(_) => Dtype::I32,
        }
    }

    /// Shape of the payload.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        match self {
            Self::F64(a) => a.shape(),
            Self::I32(a) => a.shape(),
        }
    }

    /// Borrow the f64 payload, if that is what this tensor holds.
    #[must_use]
    pub fn as_f64(&self) -> Option<&ArrayF64> {
        match self {
            Self::F64(a) => Some(a),
            Self::I32(_) => None,
        }
    }

    /// Borrow the i32 payload, if that is what this tensor holds.
    #[must_use]
    pub fn as_i32(&self) -> Option<&ArrayI32> {
        match self {
            Self::F64(_) => None,
            Self::I32(a) => Some(a),
        }
    }

    /// Check this tensor against a declared slot spec: dtype must match
    /// and every fixed dim must agree (open dims match any size).
    #[must_use]
    pub fn conforms_to(&self, spec: &TensorSpec) -> bool {
        if self.dtype() != spec.dtype {
            return false;
        }
        let shape = self.shape();
        if shape.len() != spec.shape.len() {
            return false;
        }
        shape
            .iter()
            .zip(spec.shape.iter())
            .all(|(&got, want)| want.map_or(true, |w| w == got))
    }
}

// ═══════════════════════════════════════════════════════════════════
// Slot descriptors
// ═══════════════════════════════════════════════════════════════════

/// Declared tensor slot: semantic name, dtype, and shape with
/// batch-dependent dims left as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorSpec {
    /// Fully namespaced slot name (e.g. `topology/atom_features`).
    pub name: String,
    /// Element type.
    pub dtype: Dtype,
    /// Per-dim sizes; `None` marks a dim only known at encode time.
    pub shape: Vec<Option<usize>>,
}

impl TensorSpec {
    /// f64 slot descriptor.
    #[must_use]
    pub fn f64(name: impl Into<String>, shape: Vec<Option<usize>>) -> Self {
        Self {
            name: name.into(),
            dtype: Dtype::F64,
            shape,
        }
    }

    /// i32 slot descriptor.
    #[must_use]
    pub fn i32(name: impl Into<String>, shape: Vec<Option<usize>>) -> Self {
        Self {
            name: name.into(),
            dtype: Dtype::I32,
            shape,
        }
    }
}

impl fmt::Display for TensorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (", self.name, self.dtype)?;
        for (i, dim) in self.shape.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match dim {
                Some(n) => write!(f, "{n}")?,
                None => write!(f, "?")?,
            }
        }
        write!(f, ")")
    }
}

// ═══════════════════════════════════════════════════════════════════
// Feed maps
// ═══════════════════════════════════════════════════════════════════

/// Insertion-ordered mapping from slot name to tensor value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedMap {
    slots: Vec<(String, Tensor)>,
}

impl FeedMap {
    /// Empty feed map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `tensor` to `name`. If the name already exists the value is
    /// replaced in place (the key keeps its original position) and `true`
    /// is returned.
    pub fn insert(&mut self, name: impl Into<String>, tensor: Tensor) -> bool {
        let name = name.into();
        if let Some(slot) = self.slots.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = tensor;
            return true;
        }
        self.slots.push((name, tensor));
        false
    }

    /// Look up a slot by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.slots
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    /// Slot names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|(n, _)| n.as_str())
    }

    /// (name, tensor) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.slots.iter().map(|(n, t)| (n.as_str(), t))
    }

    /// Number of bound slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when no slots are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Move every slot of `other` into `self` in order, overwriting on
    /// name collision (last write wins).
    pub fn absorb(&mut self, other: FeedMap) {
        for (name, tensor) in other.slots {
            self.insert(name, tensor);
        }
    }

    /// Ordered merge of several feed maps with last-write-wins semantics.
    #[must_use]
    pub fn merge_all(maps: impl IntoIterator<Item = FeedMap>) -> FeedMap {
        let mut merged = FeedMap::new();
        for map in maps {
            merged.absorb(map);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(v: f64) -> Tensor {
        Tensor::F64(ArrayF64::from_vec(&[1], vec![v]))
    }

    #[test]
    fn flat_offset_row_major() {
        let a = ArrayF64::from_vec(&[2, 3], vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((a.at(&[0, 0]) - 0.0).abs() < f64::EPSILON);
        assert!((a.at(&[0, 2]) - 2.0).abs() < f64::EPSILON);
        assert!((a.at(&[1, 0]) - 3.0).abs() < f64::EPSILON);
        assert!((a.at(&[1, 2]) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zeros_shape_and_len() {
        let a = ArrayF64::zeros(&[3, 4, 5]);
        assert_eq!(a.shape(), &[3, 4, 5]);
        assert_eq!(a.len(), 60);
        assert!(a.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    #[should_panic(expected = "flat length must match shape product")]
    fn from_vec_rejects_length_mismatch() {
        let _ = ArrayI32::from_vec(&[2, 2], vec![1, 2, 3]);
    }

    #[test]
    fn conforms_checks_dtype_and_fixed_dims() {
        let spec = TensorSpec::f64("t/atom_features", vec![None, Some(5)]);
        let good = Tensor::F64(ArrayF64::zeros(&[7, 5]));
        let bad_width = Tensor::F64(ArrayF64::zeros(&[7, 4]));
        let bad_dtype = Tensor::I32(ArrayI32::zeros(&[7, 5]));
        let bad_rank = Tensor::F64(ArrayF64::zeros(&[7]));
        assert!(good.conforms_to(&spec));
        assert!(!bad_width.conforms_to(&spec));
        assert!(!bad_dtype.conforms_to(&spec));
        assert!(!bad_rank.conforms_to(&spec));
    }

    #[test]
    fn spec_display_marks_open_dims() {
        let spec = TensorSpec::i32("t/deg_slice", vec![Some(11), Some(2)]);
        assert_eq!(spec.to_string(), "t/deg_slice i32 (11, 2)");
        let open = TensorSpec::f64("t/atom_features", vec![None, Some(5)]);
        assert_eq!(open.to_string(), "t/atom_features f64 (?, 5)");
    }

    #[test]
    fn insert_keeps_first_position_on_overwrite() {
        let mut m = FeedMap::new();
        assert!(!m.insert("a", scalar(1.0)));
        assert!(!m.insert("b", scalar(2.0)));
        assert!(m.insert("a", scalar(9.0)));
        let names: Vec<&str> = m.names().collect();
        assert_eq!(names, vec!["a", "b"], "overwrite must not move the key");
        let a = m.get("a").and_then(Tensor::as_f64).expect("slot a");
        assert!((a.data()[0] - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn merge_all_last_write_wins() {
        let mut first = FeedMap::new();
        first.insert("x", scalar(1.0));
        first.insert("shared", scalar(1.0));
        let mut second = FeedMap::new();
        second.insert("shared", scalar(2.0));
        second.insert("y", scalar(3.0));

        let merged = FeedMap::merge_all([first, second]);
        assert_eq!(merged.len(), 3);
        let names: Vec<&str> = merged.names().collect();
        assert_eq!(names, vec!["x", "shared", "y"]);
        let shared = merged.get("shared").and_then(Tensor::as_f64).expect("slot");
        assert!(
            (shared.data()[0] - 2.0).abs() < f64::EPSILON,
            "later map must win"
        );
    }

    #[test]
    fn get_missing_is_none() {
        let m = FeedMap::new();
        assert!(m.get("absent").is_none());
        assert!(m.is_empty());
    }
}
