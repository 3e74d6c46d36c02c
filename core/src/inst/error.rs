/// Decoder errors
///
/// Both variants signal a malformed program and are fatal: the driver must
/// stop stepping. Note that all 16 opcode values are assigned, so
/// `InvalidOpcode` is kept only for forward compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Unknown opcode: {0:#x}")]
    InvalidOpcode(u8),

    #[error("Unknown EXT function: {0:#x}")]
    InvalidFunction(u8),
}
