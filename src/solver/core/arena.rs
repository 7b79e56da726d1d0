use crate::algebra::*;
use crate::solver::core::types::QpDims;
use crate::solver::utils::make_multiple_of;
use thiserror::Error;

/// Alignment guaranteed to every carved sub-buffer, and required of the
/// start of the raw block.
pub const ARENA_ALIGN: usize = 8;

/// Error type returned by workspace arena planning and carving.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The raw block does not start on an 8-byte boundary
    #[error("workspace block is not {ARENA_ALIGN}-byte aligned")]
    Misaligned,
    /// The raw block is smaller than the planned workspace size
    #[error("workspace block too small: needed {needed} bytes, got {available}")]
    OutOfSpace { needed: usize, available: usize },
    /// The carve consumed a different byte count than the planner reported.
    /// Indicates an internal planner/assigner inconsistency.
    #[error("workspace layout mismatch: planned {planned} bytes, carved {carved}")]
    LayoutMismatch { planned: usize, carved: usize },
}

/// Exact byte size of the workspace arena for the given problem
/// dimensions.
///
/// Pure function of the dimensions.  The carve performed by
/// [`WorkspaceViews::assign`](crate::solver::core::workspace::WorkspaceViews::assign)
/// consumes exactly this many bytes; the two are held in lockstep by a
/// consistency check at carve time.  Buffers are grouped by element type
/// (floats, then pointer-width indices, then 32-bit flags) so that every
/// buffer starts naturally aligned when the block itself is 8-byte
/// aligned, and the total is rounded up to a multiple of 8.
pub fn plan_size<T: FloatT>(dims: &QpDims) -> usize {
    let n = dims.n();
    let m = dims.m();
    let ms = dims.ms();
    let na = dims.n_active_max();
    let (nb, ns) = (dims.nb, dims.ns);

    let mut floats = 0;
    floats += n * n; // Hessian
    floats += n; // cost
    floats += n * (m - ms); // constraint rows
    floats += 2 * m; // upper/lower bounds
    floats += n * (m - ms); // scaled row copy
    floats += 2 * m; // internal bound vectors
    floats += (n + 1) * n / 2; // triangular factor
    floats += n; // shift vector
    floats += m; // row scaling
    floats += 2 * n; // primal iterate & previous iterate
    floats += 2 * na; // multiplier iterate & converged copy
    floats += n; // work vector
    floats += 3 * na; // LDL diagonal, forward & backward work
    floats += (n + ns + 2) * (n + ns + 1) / 2; // LDL lower factor
    floats += 2 * nb; // bound staging
    floats += 6 * ns; // soft penalty staging

    let mut size = make_multiple_of(ARENA_ALIGN, floats * core::mem::size_of::<T>());

    let mut indices = 0;
    indices += na; // working-set list
    indices += nb; // bound index list
    indices += n; // variable -> bound map
    indices += ns; // soft index list
    indices += m; // unified slot -> soft map
    size += indices * core::mem::size_of::<usize>();

    size += m * core::mem::size_of::<u32>(); // sense flags

    make_multiple_of(ARENA_ALIGN, size)
}

/// Bump carver over a raw byte block, handing out typed mutable slices.
///
/// The cursor only moves forward; alignment of each returned slice follows
/// from the block alignment check at construction plus the type-ordering
/// discipline of the caller, and is re-verified on every cast.
pub struct ArenaCursor<'a> {
    block: &'a mut [u8],
    taken: usize,
}

impl<'a> ArenaCursor<'a> {
    pub fn new(block: &'a mut [u8]) -> Result<Self, ArenaError> {
        if (block.as_ptr() as usize) % ARENA_ALIGN != 0 {
            return Err(ArenaError::Misaligned);
        }
        Ok(Self { block, taken: 0 })
    }

    /// Carve off the next `len` elements of `P`.
    pub fn take<P: bytemuck::Pod>(&mut self, len: usize) -> Result<&'a mut [P], ArenaError> {
        let bytes = len * core::mem::size_of::<P>();
        if bytes > self.block.len() {
            return Err(ArenaError::OutOfSpace {
                needed: bytes,
                available: self.block.len(),
            });
        }
        let block = core::mem::take(&mut self.block);
        let (head, rest) = block.split_at_mut(bytes);
        self.block = rest;
        self.taken += bytes;
        bytemuck::try_cast_slice_mut(head).map_err(|_| ArenaError::Misaligned)
    }

    /// Consume padding up to the next 8-byte boundary.
    pub fn pad(&mut self) -> Result<(), ArenaError> {
        let pad = make_multiple_of(ARENA_ALIGN, self.taken) - self.taken;
        let _: &mut [u8] = self.take(pad)?;
        Ok(())
    }

    /// Bytes consumed so far.
    pub fn taken(&self) -> usize {
        self.taken
    }

    /// Zero-slack postcondition: the carve must land exactly on the
    /// planned size, or the planner and assigner have diverged.
    pub fn finish(self, planned: usize) -> Result<(), ArenaError> {
        if self.taken != planned {
            return Err(ArenaError::LayoutMismatch {
                planned,
                carved: self.taken,
            });
        }
        Ok(())
    }
}
