//! Parser for the ASCII AIGER format (`.aag`), combinational circuits only.
//!
//! The whole file is validated before any gate is created, so a malformed file never
//! yields a partially built [`Aig`].

use std::{
    collections::{HashMap, HashSet},
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::SplitWhitespace,
};

use log::{debug, info};

use super::{Aig, FaninId, GateId, GateKind, MAX_GATE_ID, ParserError, ParserErrorKind, Result};

type ParseResult<T> = std::result::Result<T, ParserError>;

/// Line reader keeping track of the 1-based line number, for error messages.
struct Lines<R> {
    reader: R,
    line: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Lines { reader, line: 0 }
    }

    fn next_line(&mut self) -> ParseResult<Option<String>> {
        let mut buf = String::new();
        let n = self
            .reader
            .read_line(&mut buf)
            .map_err(|e| ParserError::new(self.line + 1, ParserErrorKind::IoError(e.to_string())))?;
        if n == 0 {
            return Ok(None);
        }
        self.line += 1;
        let len = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(len);
        Ok(Some(buf))
    }

    /// Next line, which must exist since it should contain `what`.
    fn expect_line(&mut self, what: &'static str) -> ParseResult<String> {
        self.next_line()?
            .ok_or(ParserError::new(self.line + 1, ParserErrorKind::MissingNumber(what)))
    }

    fn error(&self, kind: ParserErrorKind) -> ParserError {
        ParserError::new(self.line, kind)
    }
}

fn read_u64(token: Option<&str>, what: &'static str) -> std::result::Result<u64, ParserErrorKind> {
    let token = token.ok_or(ParserErrorKind::MissingNumber(what))?;
    token
        .parse::<u64>()
        .map_err(|_| ParserErrorKind::IllegalNumber(what, token.to_string()))
}

fn expect_end(tokens: &mut SplitWhitespace) -> std::result::Result<(), ParserErrorKind> {
    match tokens.next() {
        Some(extra) => Err(ParserErrorKind::IllegalIdentifier(extra.to_string())),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    m: u64,
    i: u64,
    o: u64,
    a: u64,
}

impl TryFrom<&str> for Header {
    type Error = ParserErrorKind;

    fn try_from(line: &str) -> std::result::Result<Self, Self::Error> {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("aag") => (),
            Some(other) => return Err(ParserErrorKind::IllegalIdentifier(other.to_string())),
            None => return Err(ParserErrorKind::IllegalIdentifier(String::new())),
        }

        let m = read_u64(tokens.next(), "number of variables")?;
        let i = read_u64(tokens.next(), "number of PIs")?;
        let l = read_u64(tokens.next(), "number of latches")?;
        let o = read_u64(tokens.next(), "number of POs")?;
        let a = read_u64(tokens.next(), "number of AIGs")?;
        expect_end(&mut tokens)?;

        if l != 0 {
            return Err(ParserErrorKind::Latches(l));
        }
        match i.checked_add(a) {
            Some(needed) if needed <= m => (),
            _ => return Err(ParserErrorKind::NumberTooSmall(m)),
        }
        // Outputs are numbered right after the variables.
        if m.checked_add(o).is_none_or(|last| last > MAX_GATE_ID) {
            return Err(ParserErrorKind::NumberTooBig(m));
        }

        Ok(Header { m, i, o, a })
    }
}

/// Largest literal allowed by a header declaring `max` variables.
fn max_literal(max: u64) -> u64 {
    max.saturating_mul(2).saturating_add(1)
}

/// Checks a literal defining a gate (input or and output): even, in range, not the constant
/// and not defined yet. Returns the gate id.
fn define_literal(
    lit: u64,
    max: u64,
    what: &'static str,
    defined: &mut HashSet<GateId>,
) -> std::result::Result<GateId, ParserErrorKind> {
    if lit >> 1 == 0 {
        return Err(ParserErrorKind::RedefConst(lit));
    }
    if lit > max_literal(max) {
        return Err(ParserErrorKind::MaxLiteralId(lit));
    }
    if lit & 1 == 1 {
        return Err(ParserErrorKind::CannotInvert(what, lit, lit >> 1));
    }
    if !defined.insert(lit >> 1) {
        return Err(ParserErrorKind::RedefGate(lit));
    }
    Ok(lit >> 1)
}

/// Checks a literal using a gate. Returns the gate id and the inversion.
fn use_literal(lit: u64, max: u64) -> std::result::Result<(GateId, bool), ParserErrorKind> {
    if lit > max_literal(max) {
        return Err(ParserErrorKind::MaxLiteralId(lit));
    }
    Ok((lit >> 1, lit & 1 == 1))
}

fn read_input(line: &str, max: u64, defined: &mut HashSet<GateId>) -> std::result::Result<GateId, ParserErrorKind> {
    let mut tokens = line.split_whitespace();
    let lit = read_u64(tokens.next(), "PI literal")?;
    expect_end(&mut tokens)?;
    define_literal(lit, max, "PI", defined)
}

fn read_output(line: &str, max: u64) -> std::result::Result<(GateId, bool), ParserErrorKind> {
    let mut tokens = line.split_whitespace();
    let lit = read_u64(tokens.next(), "PO literal")?;
    expect_end(&mut tokens)?;
    use_literal(lit, max)
}

type AndLine = (GateId, (GateId, bool), (GateId, bool));

fn read_and(line: &str, max: u64, defined: &mut HashSet<GateId>) -> std::result::Result<AndLine, ParserErrorKind> {
    let mut tokens = line.split_whitespace();
    let lhs = read_u64(tokens.next(), "AIG gate literal")?;
    let rhs0 = read_u64(tokens.next(), "AIG input literal")?;
    let rhs1 = read_u64(tokens.next(), "AIG input literal")?;
    expect_end(&mut tokens)?;
    let id = define_literal(lhs, max, "AIG gate", defined)?;
    Ok((id, use_literal(rhs0, max)?, use_literal(rhs1, max)?))
}

/// A symbol line: `i<k> <name>` or `o<k> <name>`. Returns whether it names an input,
/// the index and the name.
fn read_symbol(line: &str) -> std::result::Result<(bool, usize, String), ParserErrorKind> {
    let (token, name) = line.split_once(' ').unwrap_or((line, ""));
    let is_input = match token.chars().next() {
        Some('i') => true,
        Some('o') => false,
        _ => return Err(ParserErrorKind::IllegalSymbolType(token.to_string())),
    };
    let index = token[1..]
        .parse::<usize>()
        .map_err(|_| ParserErrorKind::IllegalNumber("symbol index", token[1..].to_string()))?;
    if name.is_empty() {
        return Err(ParserErrorKind::MissingSymbol(token.to_string()));
    }
    Ok((is_input, index, name.to_string()))
}

/// Everything read from a file, not turned into gates yet.
struct Parsed {
    header: Header,
    inputs: Vec<GateId>,
    outputs: Vec<(GateId, bool)>,
    ands: Vec<AndLine>,
    input_symbols: HashMap<usize, String>,
    output_symbols: HashMap<usize, String>,
}

fn parse(reader: impl BufRead) -> ParseResult<Parsed> {
    let mut lines = Lines::new(reader);

    let line = lines.next_line()?.unwrap_or_default();
    let header = Header::try_from(line.as_str()).map_err(|kind| ParserError::new(1, kind))?;
    let mut defined = HashSet::new();

    let mut inputs = Vec::new();
    for _ in 0..header.i {
        let line = lines.expect_line("PI literal")?;
        inputs.push(read_input(&line, header.m, &mut defined).map_err(|k| lines.error(k))?);
    }

    let mut outputs = Vec::new();
    for _ in 0..header.o {
        let line = lines.expect_line("PO literal")?;
        outputs.push(read_output(&line, header.m).map_err(|k| lines.error(k))?);
    }

    let mut ands = Vec::new();
    for _ in 0..header.a {
        let line = lines.expect_line("AIG gate literal")?;
        ands.push(read_and(&line, header.m, &mut defined).map_err(|k| lines.error(k))?);
    }

    let mut input_symbols = HashMap::new();
    let mut output_symbols = HashMap::new();
    while let Some(line) = lines.next_line()? {
        if line.trim().is_empty() {
            continue;
        }
        // Comment section, everything after it is free text.
        if line.starts_with('c') {
            break;
        }
        let (is_input, index, name) = read_symbol(&line).map_err(|k| lines.error(k))?;
        let (symbols, count, prefix) = match is_input {
            true => (&mut input_symbols, inputs.len(), 'i'),
            false => (&mut output_symbols, outputs.len(), 'o'),
        };
        if index >= count {
            return Err(lines.error(ParserErrorKind::SymbolIndexTooBig(index)));
        }
        if symbols.insert(index, name).is_some() {
            return Err(lines.error(ParserErrorKind::RedefSymbol(format!("{}{}", prefix, index))));
        }
    }

    Ok(Parsed {
        header,
        inputs,
        outputs,
        ands,
        input_symbols,
        output_symbols,
    })
}

/// Returns `id`, creating an undefined gate first if nothing defines it.
fn ensure_gate(aig: &mut Aig, id: GateId) -> Result<GateId> {
    if aig.get_gate(id).is_none() {
        debug!("gate {} is referenced but never defined", id);
        aig.create_gate(GateKind::Undefined, id)?;
    }
    Ok(id)
}

fn build_aig(parsed: Parsed) -> Result<Aig> {
    let mut aig = Aig::new();
    let m = parsed.header.m;

    for &id in &parsed.inputs {
        aig.create_gate(GateKind::Input, id)?;
    }
    // Outputs take the ids right after the variables
    let output_ids: Vec<GateId> = (0..parsed.outputs.len() as u64).map(|k| m + 1 + k).collect();
    for &id in &output_ids {
        aig.create_gate(GateKind::Output, id)?;
    }
    for &(id, _, _) in &parsed.ands {
        aig.create_gate(GateKind::And, id)?;
    }

    for (&id, &(target, inverted)) in output_ids.iter().zip(&parsed.outputs) {
        ensure_gate(&mut aig, target)?;
        aig.connect_input(id, FaninId::Fanin0, target, inverted)?;
    }
    for &(id, (t0, i0), (t1, i1)) in &parsed.ands {
        ensure_gate(&mut aig, t0)?;
        aig.connect_input(id, FaninId::Fanin0, t0, i0)?;
        ensure_gate(&mut aig, t1)?;
        aig.connect_input(id, FaninId::Fanin1, t1, i1)?;
    }
    aig.set_max_var(m);

    for (index, name) in parsed.input_symbols {
        aig.set_symbol(parsed.inputs[index], name)?;
    }
    for (index, name) in parsed.output_symbols {
        aig.set_symbol(output_ids[index], name)?;
    }

    aig.refresh()?;
    aig.check_integrity()?;
    info!(
        "circuit read: {} PIs, {} POs, {} AIGs, {} undefined gates",
        aig.get_inputs().len(),
        aig.get_outputs().len(),
        aig.num_ands(),
        aig.get_gates().iter().filter(|g| g.is_undefined()).count()
    );
    Ok(aig)
}

impl Aig {
    /// Creates an AIG from an open .aag source using ASCII format.
    ///
    /// Use this function if the file is already open with the reader.
    ///
    /// ```rust
    /// use fraig::Aig;
    /// let aig = Aig::from_ascii("aag 3 2 0 1 1\n2\n4\n6\n6 2 5\n".as_bytes()).unwrap();
    /// assert_eq!(aig.get_inputs(), &[1, 2]);
    /// assert_eq!(aig.get_outputs(), &[4]);
    /// ```
    pub fn from_ascii(reader: impl BufRead) -> Result<Self> {
        let parsed = parse(reader)?;
        build_aig(parsed)
    }

    /// Creates an AIG from a .aag file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("aag") => (),
            _ => {
                return Err(ParserError::new(
                    0,
                    ParserErrorKind::IoError("invalid extension, expected .aag".to_string()),
                )
                .into());
            }
        }
        let f = File::open(path.as_ref())
            .map_err(|z| ParserError::new(0, ParserErrorKind::IoError(z.to_string())))?;
        Aig::from_ascii(BufReader::new(f))
    }
}
