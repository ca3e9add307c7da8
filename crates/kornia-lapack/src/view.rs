use crate::layout::{classify, Layout};

/// An error type for the construction of matrix and vector views.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    /// A stride is zero.
    ///
    /// Views never alias two logical elements onto the same storage slot.
    #[error("Strides must be positive")]
    ZeroStride,

    /// Neither matrix stride is one.
    ///
    /// Every matrix view must be contiguous along one of its axes, which is what the kernels
    /// and the layout adapter can read directly or stage.
    #[error("Matrix view has no unit stride (row stride {row_stride}, column stride {col_stride})")]
    NoUnitStride {
        /// Distance between consecutive rows.
        row_stride: usize,
        /// Distance between consecutive columns.
        col_stride: usize,
    },

    /// The view reaches past the end of the borrowed storage.
    ///
    /// # Recommended Actions
    ///
    /// - Check that the shape and strides describe the intended sub-matrix
    /// - Make sure the slice starts at element `(0, 0)` of the view
    #[error("View needs {required} elements but the storage holds {len}")]
    OutOfBounds {
        /// Number of storage elements the view spans.
        required: usize,
        /// Number of elements available.
        len: usize,
    },
}

fn span(rows: usize, cols: usize, row_stride: usize, col_stride: usize) -> usize {
    if rows == 0 || cols == 0 {
        return 0;
    }
    (rows - 1)
        .saturating_mul(row_stride)
        .saturating_add((cols - 1).saturating_mul(col_stride))
        .saturating_add(1)
}

fn check_matrix(
    len: usize,
    rows: usize,
    cols: usize,
    row_stride: usize,
    col_stride: usize,
) -> Result<(), ViewError> {
    if row_stride == 0 || col_stride == 0 {
        return Err(ViewError::ZeroStride);
    }
    if row_stride != 1 && col_stride != 1 {
        return Err(ViewError::NoUnitStride {
            row_stride,
            col_stride,
        });
    }
    let required = span(rows, cols, row_stride, col_stride);
    if required > len {
        return Err(ViewError::OutOfBounds { required, len });
    }
    Ok(())
}

fn check_vector(data_len: usize, len: usize, stride: usize) -> Result<(), ViewError> {
    if stride == 0 {
        return Err(ViewError::ZeroStride);
    }
    let required = span(len, 1, stride, 1);
    if required > data_len {
        return Err(ViewError::OutOfBounds {
            required,
            len: data_len,
        });
    }
    Ok(())
}

/// A read-only view of a dense `f64` matrix inside a borrowed slice.
///
/// Element `(i, j)` lives at `data[i * row_stride + j * col_stride]`. One of the two strides
/// must be one; the other is the leading dimension of the storage. A row-major `m x n` matrix
/// has strides `(n, 1)` and a column-major one has strides `(1, m)`.
///
/// # Examples
///
/// ```rust
/// use kornia_lapack::MatrixView;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
/// let a = MatrixView::from_row_major(&data, 2, 3).unwrap();
/// assert_eq!(a.get(1, 0), Some(4.0));
///
/// // the transpose shares the storage
/// let at = a.transpose();
/// assert_eq!(at.get(0, 1), Some(4.0));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct MatrixView<'a> {
    data: &'a [f64],
    rows: usize,
    cols: usize,
    row_stride: usize,
    col_stride: usize,
}

impl<'a> MatrixView<'a> {
    /// Creates a view with explicit strides.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError`] when a stride is zero, when neither stride is one, or when the
    /// view spans more elements than `data` holds.
    pub fn new(
        data: &'a [f64],
        rows: usize,
        cols: usize,
        row_stride: usize,
        col_stride: usize,
    ) -> Result<Self, ViewError> {
        check_matrix(data.len(), rows, cols, row_stride, col_stride)?;
        Ok(Self {
            data,
            rows,
            cols,
            row_stride,
            col_stride,
        })
    }

    /// Creates a view of a densely packed row-major matrix.
    pub fn from_row_major(data: &'a [f64], rows: usize, cols: usize) -> Result<Self, ViewError> {
        Self::new(data, rows, cols, cols.max(1), 1)
    }

    /// Creates a view of a densely packed column-major matrix.
    pub fn from_col_major(data: &'a [f64], rows: usize, cols: usize) -> Result<Self, ViewError> {
        Self::new(data, rows, cols, 1, rows.max(1))
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Distance in elements between consecutive rows.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Distance in elements between consecutive columns.
    #[inline]
    pub fn col_stride(&self) -> usize {
        self.col_stride
    }

    /// Whether the view has as many rows as columns.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Storage offset of element `(i, j)`.
    #[inline]
    pub fn offset(&self, i: usize, j: usize) -> usize {
        i * self.row_stride + j * self.col_stride
    }

    /// Returns element `(i, j)`, or `None` when it is outside the view.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.rows && j < self.cols {
            Some(self.data[self.offset(i, j)])
        } else {
            None
        }
    }

    /// The transposed matrix over the same storage.
    pub fn transpose(self) -> MatrixView<'a> {
        MatrixView {
            data: self.data,
            rows: self.cols,
            cols: self.rows,
            row_stride: self.col_stride,
            col_stride: self.row_stride,
        }
    }

    /// How the kernels can consume this view. See [`classify`].
    pub fn layout(&self) -> Layout {
        classify(self.rows, self.cols, self.row_stride, self.col_stride)
    }

    pub(crate) fn data(&self) -> &'a [f64] {
        self.data
    }
}

/// A mutable view of a dense `f64` matrix inside a borrowed slice.
///
/// Same addressing rules as [`MatrixView`]. The operations of this crate take their matrix
/// operands as `MatrixViewMut` and write results back through the view, whatever its
/// orientation.
#[derive(Debug)]
pub struct MatrixViewMut<'a> {
    data: &'a mut [f64],
    rows: usize,
    cols: usize,
    row_stride: usize,
    col_stride: usize,
}

impl<'a> MatrixViewMut<'a> {
    /// Creates a mutable view with explicit strides.
    ///
    /// # Errors
    ///
    /// Same conditions as [`MatrixView::new`].
    pub fn new(
        data: &'a mut [f64],
        rows: usize,
        cols: usize,
        row_stride: usize,
        col_stride: usize,
    ) -> Result<Self, ViewError> {
        check_matrix(data.len(), rows, cols, row_stride, col_stride)?;
        Ok(Self {
            data,
            rows,
            cols,
            row_stride,
            col_stride,
        })
    }

    /// Creates a mutable view of a densely packed row-major matrix.
    pub fn from_row_major(
        data: &'a mut [f64],
        rows: usize,
        cols: usize,
    ) -> Result<Self, ViewError> {
        Self::new(data, rows, cols, cols.max(1), 1)
    }

    /// Creates a mutable view of a densely packed column-major matrix.
    pub fn from_col_major(
        data: &'a mut [f64],
        rows: usize,
        cols: usize,
    ) -> Result<Self, ViewError> {
        Self::new(data, rows, cols, 1, rows.max(1))
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Distance in elements between consecutive rows.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Distance in elements between consecutive columns.
    #[inline]
    pub fn col_stride(&self) -> usize {
        self.col_stride
    }

    /// Whether the view has as many rows as columns.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Storage offset of element `(i, j)`.
    #[inline]
    pub fn offset(&self, i: usize, j: usize) -> usize {
        i * self.row_stride + j * self.col_stride
    }

    /// Returns element `(i, j)`, or `None` when it is outside the view.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.as_view().get(i, j)
    }

    /// Overwrites element `(i, j)`. Returns `false` and leaves the storage untouched when the
    /// index is outside the view.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> bool {
        if i < self.rows && j < self.cols {
            let k = self.offset(i, j);
            self.data[k] = value;
            true
        } else {
            false
        }
    }

    /// Reborrows as a read-only view.
    pub fn as_view(&self) -> MatrixView<'_> {
        MatrixView {
            data: self.data,
            rows: self.rows,
            cols: self.cols,
            row_stride: self.row_stride,
            col_stride: self.col_stride,
        }
    }

    /// The transposed matrix over the same storage.
    pub fn transpose(self) -> MatrixViewMut<'a> {
        MatrixViewMut {
            data: self.data,
            rows: self.cols,
            cols: self.rows,
            row_stride: self.col_stride,
            col_stride: self.row_stride,
        }
    }

    /// How the kernels can consume this view. See [`classify`].
    pub fn layout(&self) -> Layout {
        classify(self.rows, self.cols, self.row_stride, self.col_stride)
    }

    /// Swaps elements `(i1, j1)` and `(i2, j2)`.
    pub(crate) fn swap_entries(&mut self, (i1, j1): (usize, usize), (i2, j2): (usize, usize)) {
        let (x, y) = (self.offset(i1, j1), self.offset(i2, j2));
        self.data.swap(x, y);
    }

    /// Swaps columns `p` and `q`.
    pub(crate) fn swap_columns(&mut self, p: usize, q: usize) {
        for i in 0..self.rows {
            self.swap_entries((i, p), (i, q));
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        self.data
    }
}

/// A read-only strided view of a `f64` vector.
#[derive(Clone, Copy, Debug)]
pub struct VectorView<'a> {
    data: &'a [f64],
    len: usize,
    stride: usize,
}

impl<'a> VectorView<'a> {
    /// Creates a view of `len` elements spaced `stride` apart.
    pub fn new(data: &'a [f64], len: usize, stride: usize) -> Result<Self, ViewError> {
        check_vector(data.len(), len, stride)?;
        Ok(Self { data, len, stride })
    }

    /// Views the whole slice with unit stride.
    pub fn contiguous(data: &'a [f64]) -> Self {
        Self {
            data,
            len: data.len(),
            stride: 1,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distance in elements between consecutive entries.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns element `i`, or `None` when it is outside the view.
    pub fn get(&self, i: usize) -> Option<f64> {
        (i < self.len).then(|| self.data[i * self.stride])
    }

    /// Iterates over the elements in order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + 'a {
        let data = self.data;
        let stride = self.stride;
        (0..self.len).map(move |i| data[i * stride])
    }
}

/// A mutable strided view of a `f64` vector.
#[derive(Debug)]
pub struct VectorViewMut<'a> {
    data: &'a mut [f64],
    len: usize,
    stride: usize,
}

impl<'a> VectorViewMut<'a> {
    /// Creates a mutable view of `len` elements spaced `stride` apart.
    pub fn new(data: &'a mut [f64], len: usize, stride: usize) -> Result<Self, ViewError> {
        check_vector(data.len(), len, stride)?;
        Ok(Self { data, len, stride })
    }

    /// Views the whole slice with unit stride.
    pub fn contiguous(data: &'a mut [f64]) -> Self {
        let len = data.len();
        Self {
            data,
            len,
            stride: 1,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Distance in elements between consecutive entries.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns element `i`, or `None` when it is outside the view.
    pub fn get(&self, i: usize) -> Option<f64> {
        (i < self.len).then(|| self.data[i * self.stride])
    }

    /// Overwrites element `i`. Returns `false` when the index is outside the view.
    pub fn set(&mut self, i: usize, value: f64) -> bool {
        if i < self.len {
            self.data[i * self.stride] = value;
            true
        } else {
            false
        }
    }

    /// Swaps elements `i` and `j`.
    pub(crate) fn swap(&mut self, i: usize, j: usize) {
        self.data.swap(i * self.stride, j * self.stride);
    }

    /// Reborrows as a read-only view.
    pub fn as_view(&self) -> VectorView<'_> {
        VectorView {
            data: self.data,
            len: self.len,
            stride: self.stride,
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        self.data
    }
}
