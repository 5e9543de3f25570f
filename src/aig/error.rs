use thiserror::Error;

use crate::fraig::FraigError;
use crate::sim::PatternError;

use super::GateId;

/// The result of an AIG operation.
pub type Result<T> = std::result::Result<T, AigError>;

/// Error returned when an AIG operation failed.
#[derive(Debug, Error)]
pub enum AigError {
    /// A different gate with the given id already exists.
    #[error("a gate with id={0} already exists")]
    DuplicateId(GateId),

    /// The id belonged to a gate that was deleted. Ids are never reused.
    #[error("id={0} belonged to a deleted gate and cannot be reused")]
    RetiredId(GateId),

    /// The id is above [`MAX_GATE_ID`], its literals would not fit in a `u64`.
    ///
    /// [`MAX_GATE_ID`]: super::MAX_GATE_ID
    #[error("id={0} is too big")]
    IdTooBig(GateId),

    /// The id 0 is reserved for the `Const0` gate only.
    #[error("id=0 is for gate Const0 only")]
    IdZeroButNotConst,

    /// The gate with given id does not exist.
    #[error("gate with id={0} does not exist")]
    GateDoesNotExist(GateId),

    /// Invalid operation on a gate which does not have such fanin slot.
    /// Outputs only have [`FaninId::Fanin0`], inputs, constants and undefined gates have none.
    ///
    /// [`FaninId::Fanin0`]: super::FaninId::Fanin0
    #[error("gate {0} has no such fanin")]
    NoFanin(GateId),

    /// The gate cannot be deleted while another gate still uses it as a fanin.
    #[error("gate {0} is still referenced by {1} fanout(s)")]
    GateStillReferenced(GateId, usize),

    /// Constant, inputs and outputs form the interface of the circuit and are never deleted.
    #[error("gate {0} is part of the circuit interface and cannot be deleted")]
    CannotDelete(GateId),

    /// A gate cannot be merged into itself.
    #[error("cannot merge gate {0} into itself")]
    SelfMerge(GateId),

    /// The operation was interrupted through a [`CancelFlag`].
    ///
    /// [`CancelFlag`]: crate::CancelFlag
    #[error("operation cancelled")]
    Cancelled,

    /// Writing a circuit or a simulation trace failed.
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// The AIG has reached an invalid state. This should never happen.
    /// For example, a fanin of some gate is not mirrored by a fanout on its target.
    #[error("the AIG has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),

    /// Just forwarding a [`ParserError`].
    #[error("{0}")]
    ParserError(#[from] ParserError),

    /// Just forwarding a [`PatternError`].
    #[error("{0}")]
    PatternError(#[from] PatternError),

    /// Just forwarding a [`FraigError`].
    #[error("{0}")]
    FraigError(#[from] FraigError),
}

/// Error returned when reading a circuit failed.
///
/// It is defined here because the `parser` module is private.
#[derive(Debug, Error)]
#[error("line {line}: {kind}")]
pub struct ParserError {
    /// 1-based line number where the error was detected (0 when no line applies).
    pub line: usize,
    pub kind: ParserErrorKind,
}

/// What went wrong while reading a circuit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParserErrorKind {
    /// An identifier was expected (`aag`, a symbol type, ...).
    #[error("illegal identifier \"{0}\"")]
    IllegalIdentifier(String),

    /// A number was expected but is missing.
    #[error("missing {0}")]
    MissingNumber(&'static str),

    /// A token that should be a number is not one.
    #[error("illegal {0} \"{1}\"")]
    IllegalNumber(&'static str, String),

    /// Header counts are inconsistent.
    #[error("number of variables is too small ({0})")]
    NumberTooSmall(u64),

    /// The variables and the outputs would not fit below the largest gate id.
    #[error("number of variables is too big ({0})")]
    NumberTooBig(u64),

    /// Latches are not supported, only combinational circuits are.
    #[error("latches are not supported (found {0})")]
    Latches(u64),

    /// A literal refers to an id above the maximum declared in the header.
    #[error("literal \"{0}\" exceeds maximum valid id")]
    MaxLiteralId(u64),

    /// An input or an AND gate was defined with an odd literal.
    #[error("{0} {1}({2}) cannot be inverted")]
    CannotInvert(&'static str, u64, u64),

    /// An input or an AND gate tried to redefine the constant.
    #[error("cannot redefine constant ({0})")]
    RedefConst(u64),

    /// The same literal was defined twice.
    #[error("literal \"{0}\" is redefined")]
    RedefGate(u64),

    /// Symbol lines must start with `i` or `o`.
    #[error("illegal symbol type ({0})")]
    IllegalSymbolType(String),

    /// A symbol index does not match any input or output.
    #[error("symbol index {0} is too big")]
    SymbolIndexTooBig(usize),

    /// A symbol name was given twice for the same gate.
    #[error("symbolic name for \"{0}\" is redefined")]
    RedefSymbol(String),

    /// A symbol line with no name.
    #[error("missing symbolic name for \"{0}\"")]
    MissingSymbol(String),

    /// An IO error occured (file doesn't exist, or doesn't have the right extension, ...).
    #[error("io error: {0}")]
    IoError(String),
}

impl ParserError {
    pub fn new(line: usize, kind: ParserErrorKind) -> Self {
        ParserError { line, kind }
    }
}
