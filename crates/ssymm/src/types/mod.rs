//! Selectors, kernel variants and matrix descriptors.
//!
//! The kernel family is specialized along five axes:
//!
//! | Axis | Values | Entry point tag |
//! |------|--------|-----------------|
//! | [`Schedule`] | hardware / software | `hw` / `sw` |
//! | [`Uplo`] | upper / lower | `up` / `lo` |
//! | [`Side`] | left / right | `left` / `right` |
//! | [`Alignment`] | generic / full tile | `` / `_fulltile` |
//! | [`IndexMath`] | wide / 24-bit | `` / `fast_` |
//!
//! giving 32 entry points, e.g. `fast_ssymm_main_hw_lo_left_fulltile`.
//!
//! All matrices are stored column-major: element `(row, col)` of a matrix
//! with leading dimension `ld` lives at `col * ld + row`.

use std::fmt;

/// Which triangle of the symmetric matrix A is stored.
///
/// The other triangle is never read; its elements are inferred as
/// `A[j][i] = A[i][j]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uplo {
    /// Elements with `row <= col` are authoritative.
    Upper,
    /// Elements with `row >= col` are authoritative.
    Lower,
}

impl Uplo {
    /// Short tag used in entry point names.
    pub fn tag(self) -> &'static str {
        match self {
            Uplo::Upper => "up",
            Uplo::Lower => "lo",
        }
    }
}

/// Which side the symmetric operand multiplies from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// `C = alpha * A * B + beta * C`, A is `m x m`.
    Left,
    /// `C = alpha * B * A + beta * C`, A is `n x n`.
    Right,
}

impl Side {
    /// Short tag used in entry point names.
    pub fn tag(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// How output tiles are distributed over scheduling units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schedule {
    /// One scheduling unit per output tile, addressed directly by the launch grid.
    Hardware,
    /// A bounded grid; each scheduling unit walks the output in super-tile steps.
    Software,
}

impl Schedule {
    /// Short tag used in entry point names.
    pub fn tag(self) -> &'static str {
        match self {
            Schedule::Hardware => "hw",
            Schedule::Software => "sw",
        }
    }
}

/// Boundary handling of the output tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Partial tiles at the matrix edge are clamped.
    Generic,
    /// Every dimension is a multiple of the tile size; no clamping.
    FullTile,
}

/// Address arithmetic used by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexMath {
    /// Full-width offsets.
    Wide,
    /// 24-bit unsigned multiplies; only valid when every offset fits in 24 bits.
    Fast24,
}

/// One of the 32 kernel entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KernelVariant {
    pub schedule: Schedule,
    pub uplo: Uplo,
    pub side: Side,
    pub alignment: Alignment,
    pub index: IndexMath,
}

impl KernelVariant {
    /// All 32 entry points, in declaration order.
    pub fn all() -> impl Iterator<Item = KernelVariant> {
        const SIDES: [Side; 2] = [Side::Right, Side::Left];
        const UPLOS: [Uplo; 2] = [Uplo::Lower, Uplo::Upper];
        const SCHEDULES: [Schedule; 2] = [Schedule::Hardware, Schedule::Software];
        const INDEX: [IndexMath; 2] = [IndexMath::Wide, IndexMath::Fast24];
        const ALIGN: [Alignment; 2] = [Alignment::Generic, Alignment::FullTile];

        ALIGN.into_iter().flat_map(|alignment| {
            INDEX.into_iter().flat_map(move |index| {
                SCHEDULES.into_iter().flat_map(move |schedule| {
                    SIDES.into_iter().flat_map(move |side| {
                        UPLOS.into_iter().map(move |uplo| KernelVariant {
                            schedule,
                            uplo,
                            side,
                            alignment,
                            index,
                        })
                    })
                })
            })
        })
    }

    /// Entry point name of this variant.
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for KernelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index == IndexMath::Fast24 {
            write!(f, "fast_")?;
        }
        write!(
            f,
            "ssymm_main_{}_{}_{}",
            self.schedule.tag(),
            self.uplo.tag(),
            self.side.tag()
        )?;
        if self.alignment == Alignment::FullTile {
            write!(f, "_fulltile")?;
        }
        Ok(())
    }
}

/// Parameter bundle shared by every entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SsymmParams {
    pub side: Side,
    pub uplo: Uplo,
    /// Rows of B and C.
    pub m: usize,
    /// Columns of B and C.
    pub n: usize,
    pub alpha: f32,
    pub beta: f32,
    pub lda: usize,
    pub ldb: usize,
    pub ldc: usize,
}

impl SsymmParams {
    /// Parameters for tightly packed matrices, `alpha = 1`, `beta = 0`.
    pub fn new(side: Side, uplo: Uplo, m: usize, n: usize) -> Self {
        let ka = match side {
            Side::Left => m,
            Side::Right => n,
        };
        Self {
            side,
            uplo,
            m,
            n,
            alpha: 1.0,
            beta: 0.0,
            lda: ka.max(1),
            ldb: m.max(1),
            ldc: m.max(1),
        }
    }

    /// Order of the symmetric matrix A, which is also the reduction length.
    pub fn ka(&self) -> usize {
        match self.side {
            Side::Left => self.m,
            Side::Right => self.n,
        }
    }
}

/// Read-only column-major matrix view.
#[derive(Debug, Clone, Copy)]
pub struct MatRef<'a> {
    data: &'a [f32],
    rows: usize,
    cols: usize,
    ld: usize,
}

impl<'a> MatRef<'a> {
    /// Wrap a column-major slice.
    ///
    /// The caller guarantees `ld >= rows` and that the slice covers the
    /// last column; the caller layer checks both before building views.
    pub fn new(data: &'a [f32], rows: usize, cols: usize, ld: usize) -> Self {
        debug_assert!(ld >= rows.max(1));
        debug_assert!(rows == 0 || cols == 0 || data.len() >= required_len(rows, cols, ld));
        Self { data, rows, cols, ld }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Leading dimension (distance between consecutive columns).
    pub fn ld(&self) -> usize {
        self.ld
    }

    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Element `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[col * self.ld + row]
    }
}

/// Mutable column-major matrix view.
#[derive(Debug)]
pub struct MatMut<'a> {
    data: &'a mut [f32],
    rows: usize,
    cols: usize,
    ld: usize,
}

impl<'a> MatMut<'a> {
    /// Wrap a mutable column-major slice. Same preconditions as [`MatRef::new`].
    pub fn new(data: &'a mut [f32], rows: usize, cols: usize, ld: usize) -> Self {
        debug_assert!(ld >= rows.max(1));
        debug_assert!(rows == 0 || cols == 0 || data.len() >= required_len(rows, cols, ld));
        Self { data, rows, cols, ld }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn ld(&self) -> usize {
        self.ld
    }

    /// Reborrow as a read-only view.
    pub fn as_ref(&self) -> MatRef<'_> {
        MatRef {
            data: self.data,
            rows: self.rows,
            cols: self.cols,
            ld: self.ld,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        self.data
    }
}

/// Minimum slice length holding a `rows x cols` column-major matrix.
pub fn required_len(rows: usize, cols: usize, ld: usize) -> usize {
    if rows == 0 || cols == 0 {
        0
    } else {
        (cols - 1) * ld + rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_variant_names() {
        let v = KernelVariant {
            schedule: Schedule::Hardware,
            uplo: Uplo::Lower,
            side: Side::Right,
            alignment: Alignment::Generic,
            index: IndexMath::Wide,
        };
        assert_eq!(v.name(), "ssymm_main_hw_lo_right");

        let v = KernelVariant {
            schedule: Schedule::Software,
            uplo: Uplo::Upper,
            side: Side::Left,
            alignment: Alignment::FullTile,
            index: IndexMath::Fast24,
        };
        assert_eq!(v.name(), "fast_ssymm_main_sw_up_left_fulltile");
    }

    #[test]
    fn test_all_variants_distinct() {
        let names: HashSet<String> = KernelVariant::all().map(|v| v.name()).collect();
        assert_eq!(names.len(), 32);
        assert!(names.contains("ssymm_main_sw_lo_left"));
        assert!(names.contains("fast_ssymm_main_hw_up_right_fulltile"));
    }

    #[test]
    fn test_first_variant_matches_declaration_order() {
        let first = KernelVariant::all().next().unwrap();
        assert_eq!(first.name(), "ssymm_main_hw_lo_right");
    }

    #[test]
    fn test_params_ka() {
        let p = SsymmParams::new(Side::Left, Uplo::Upper, 5, 7);
        assert_eq!(p.ka(), 5);
        assert_eq!(p.lda, 5);

        let p = SsymmParams::new(Side::Right, Uplo::Upper, 5, 7);
        assert_eq!(p.ka(), 7);
        assert_eq!(p.lda, 7);
        assert_eq!(p.ldc, 5);
    }

    #[test]
    fn test_mat_ref_column_major() {
        // 2x3 with ld = 3 (one padding row per column)
        let data = [1.0, 2.0, -1.0, 3.0, 4.0, -1.0, 5.0, 6.0];
        let m = MatRef::new(&data, 2, 3, 3);
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(1, 0), 2.0);
        assert_eq!(m.get(0, 1), 3.0);
        assert_eq!(m.get(1, 2), 6.0);
    }

    #[test]
    fn test_mat_mut_writes_visible_through_as_ref() {
        let mut data = [0.0f32; 8];
        let mut m = MatMut::new(&mut data, 2, 3, 3);
        let ld = m.ld();
        m.as_mut_slice()[2 * ld + 1] = 7.0;
        let view = m.as_ref();
        assert_eq!((view.rows(), view.cols(), view.ld()), (2, 3, 3));
        assert_eq!(view.get(1, 2), 7.0);
        assert_eq!(view.get(0, 2), 0.0);
    }

    #[test]
    fn test_required_len() {
        assert_eq!(required_len(0, 4, 4), 0);
        assert_eq!(required_len(3, 2, 5), 8);
        assert_eq!(required_len(4, 4, 4), 16);
    }
}
