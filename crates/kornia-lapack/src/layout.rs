//! Storage classification and the copies between caller views and column-major windows.

use crate::error::LapackError;
use crate::view::{MatrixView, MatrixViewMut, VectorViewMut};

/// How a matrix view sits in memory from the point of view of a column-major kernel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    /// Unit row stride: the kernel can use the storage as is with leading dimension `ld`.
    ColumnMajor {
        /// Leading dimension to pass to the kernel.
        ld: usize,
    },
    /// Unit column stride: the storage is the column-major transpose with leading dimension `ld`.
    RowMajor {
        /// Leading dimension of the transposed matrix.
        ld: usize,
    },
    /// The strides overlap; no kernel can consume the view.
    Invalid,
}

impl Layout {
    /// Whether a kernel can read the storage directly.
    pub fn is_column_major(&self) -> bool {
        matches!(self, Layout::ColumnMajor { .. })
    }
}

/// Classifies an `rows x cols` matrix with the given strides.
///
/// Column-major wins whenever both orders describe the storage, which happens for single rows
/// or columns.
///
/// # Examples
///
/// ```rust
/// use kornia_lapack::{classify, Layout};
///
/// assert_eq!(classify(3, 4, 4, 1), Layout::RowMajor { ld: 4 });
/// assert_eq!(classify(3, 4, 1, 5), Layout::ColumnMajor { ld: 5 });
/// assert_eq!(classify(3, 4, 1, 2), Layout::Invalid);
/// ```
pub fn classify(rows: usize, cols: usize, row_stride: usize, col_stride: usize) -> Layout {
    if row_stride == 1 && (cols <= 1 || col_stride >= rows) {
        let ld = if cols <= 1 { rows } else { col_stride };
        return Layout::ColumnMajor { ld: ld.max(1) };
    }
    if col_stride == 1 && (rows <= 1 || row_stride >= cols) {
        let ld = if rows <= 1 { cols } else { row_stride };
        return Layout::RowMajor { ld: ld.max(1) };
    }
    Layout::Invalid
}

/// The layout of an operand, or the argument error when its strides overlap.
pub(crate) fn operand_layout(
    layout: Layout,
    position: usize,
    name: &'static str,
) -> Result<Layout, LapackError> {
    match layout {
        Layout::Invalid => Err(LapackError::invalid_argument(position, name)),
        layout => Ok(layout),
    }
}

/// Staging elements needed to hand `view` to a kernel.
pub(crate) fn staging_len(view: &MatrixView<'_>) -> usize {
    if view.layout().is_column_major() {
        0
    } else {
        view.rows() * view.cols()
    }
}

/// Staging elements needed to hand a vector of `len` elements with `stride` to a kernel.
pub(crate) fn vector_staging_len(len: usize, stride: usize) -> usize {
    if stride == 1 || len <= 1 {
        0
    } else {
        len
    }
}

/// Copies `src` into `dst` in column-major order with leading dimension `max(rows, 1)`.
pub(crate) fn materialize(src: &MatrixView<'_>, dst: &mut [f64]) {
    let rows = src.rows();
    let data = src.data();
    for j in 0..src.cols() {
        for i in 0..rows {
            dst[i + j * rows] = data[src.offset(i, j)];
        }
    }
}

/// Copies a column-major window with leading dimension `ld` into `dst`.
pub(crate) fn scatter_back(src: &[f64], ld: usize, dst: &mut MatrixViewMut<'_>) {
    for j in 0..dst.cols() {
        for i in 0..dst.rows() {
            let k = dst.offset(i, j);
            dst.data_mut()[k] = src[i + j * ld];
        }
    }
}

/// Copies the transpose of a column-major window with leading dimension `ld` into `dst`.
pub(crate) fn scatter_transposed(src: &[f64], ld: usize, dst: &mut MatrixViewMut<'_>) {
    for j in 0..dst.cols() {
        for i in 0..dst.rows() {
            let k = dst.offset(i, j);
            dst.data_mut()[k] = src[j + i * ld];
        }
    }
}

/// Transposes the leading `n x n` block of a column-major buffer.
pub(crate) fn transpose_square_in_place(data: &mut [f64], n: usize, ld: usize) {
    for j in 1..n {
        for i in 0..j {
            data.swap(i + j * ld, j + i * ld);
        }
    }
}

/// Column-major storage handed to a kernel.
pub(crate) struct Window<'a> {
    pub data: &'a mut [f64],
    pub ld: usize,
}

impl Window<'_> {
    /// Window for an operand the kernel does not reference.
    pub fn unused() -> Window<'static> {
        Window {
            data: &mut [],
            ld: 1,
        }
    }
}

/// Returns the view's own storage when it is column-major, otherwise `scratch`, loaded with the
/// view's contents when `load` is set.
pub(crate) fn column_major_window<'a>(
    view: &'a mut MatrixViewMut<'_>,
    scratch: &'a mut [f64],
    load: bool,
) -> Window<'a> {
    match view.layout() {
        Layout::ColumnMajor { ld } => Window {
            data: view.data_mut(),
            ld,
        },
        _ => {
            if load {
                materialize(&view.as_view(), scratch);
            }
            Window {
                data: scratch,
                ld: view.rows().max(1),
            }
        }
    }
}

/// Like [`column_major_window`] for an operand that may be absent.
pub(crate) fn optional_window<'a>(
    view: Option<&'a mut MatrixViewMut<'_>>,
    scratch: &'a mut [f64],
    load: bool,
) -> Window<'a> {
    match view {
        Some(view) => column_major_window(view, scratch, load),
        None => Window::unused(),
    }
}

/// Writes a staged window back when `view` is not column-major.
pub(crate) fn finish(view: &mut MatrixViewMut<'_>, scratch: &[f64]) {
    if !view.layout().is_column_major() {
        scatter_back(scratch, view.rows().max(1), view);
    }
}

/// Output storage for a vector: the view's own elements when contiguous, otherwise `scratch`.
pub(crate) fn vector_window<'a>(
    view: &'a mut VectorViewMut<'_>,
    scratch: &'a mut [f64],
) -> &'a mut [f64] {
    let len = view.len();
    if vector_staging_len(len, view.stride()) == 0 {
        &mut view.data_mut()[..len]
    } else {
        &mut scratch[..len]
    }
}

/// Writes staged vector output back into a strided view.
pub(crate) fn finish_vector(view: &mut VectorViewMut<'_>, scratch: &[f64]) {
    if vector_staging_len(view.len(), view.stride()) > 0 {
        for (i, &x) in scratch.iter().enumerate().take(view.len()) {
            view.set(i, x);
        }
    }
}
