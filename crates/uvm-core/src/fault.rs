use std::io;

use thiserror::Error;

/// A terminal error that stops the dispatch loop and moves the [`crate::Engine`] into the
/// `Faulted` state.
///
/// Every variant here is attributable to either a malformed/misbehaving guest program or the
/// host environment (`HostIoError`/`OutOfHostMemory`); none are recoverable from inside the VM.
#[derive(Error, Debug)]
pub enum Fault {
    /// A fetch was attempted with `ip` at or past the end of segment 0.
    #[error("instruction pointer {ip:#x} is out of bounds")]
    InstructionPointerOutOfBounds { ip: u32 },

    /// The decoded opcode value was 14 or greater.
    #[error("illegal instruction: opcode {opcode} is not defined")]
    IllegalInstruction { opcode: u32 },

    /// A segment identifier named in Array-Index, Array-Amend, Abandon, or Load-Program is not
    /// live.
    #[error("segment {id:#x} is not live")]
    InvalidSegment { id: u32 },

    /// An offset named in Array-Index or Array-Amend is at or past the end of the segment.
    #[error("offset {offset:#x} is out of bounds for segment {id:#x} of length {len:#x}")]
    SegmentOffsetOutOfBounds { id: u32, offset: u32, len: u32 },

    /// Abandon was called with identifier 0.
    #[error("segment 0 cannot be abandoned")]
    AbandonSegmentZero,

    /// Divide was called with a zero divisor.
    #[error("division by zero")]
    DivideByZero,

    /// Output was called with a value greater than 255.
    #[error("output value {0:#x} does not fit in a byte")]
    OutputOutOfRange(u32),

    /// The host reader or writer returned an error.
    #[error("host I/O error: {0}")]
    HostIoError(#[from] io::Error),

    /// The host allocator refused to satisfy an allocation request.
    #[error("out of host memory: could not allocate {requested} words")]
    OutOfHostMemory { requested: u32 },
}
