//! Recursive-descent parser building an IR circuit directly.

use logos::Logos;
use rustc_hash::FxHashMap;
use std::f64::consts::PI;

use alsvid_ir::{Circuit, ClbitId, Instruction, QubitId, StandardGate};

use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

/// Parse QASM source into a circuit.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    let mut tokens = Vec::new();
    for (token, span) in Token::lexer(source).spanned() {
        let token = token.map_err(|()| ParseError::Lex { offset: span.start })?;
        tokens.push((token, span.start));
    }
    Parser::new(tokens).run()
}

/// A register operand, indexed or whole.
enum Operand {
    Whole(String),
    Indexed(String, u64),
}

#[derive(Clone, Copy)]
struct Register {
    start: u32,
    size: u32,
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    circuit: Circuit,
    qregs: FxHashMap<String, Register>,
    cregs: FxHashMap<String, Register>,
}

impl Parser {
    fn new(tokens: Vec<(Token, usize)>) -> Self {
        Self {
            tokens,
            pos: 0,
            circuit: Circuit::new("main"),
            qregs: FxHashMap::default(),
            cregs: FxHashMap::default(),
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn next(&mut self, expected: &str) -> ParseResult<(Token, usize)> {
        let item = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        item.ok_or_else(|| ParseError::UnexpectedEof {
            expected: expected.to_string(),
        })
    }

    fn expect(&mut self, token: &Token, expected: &str) -> ParseResult<()> {
        let (found, offset) = self.next(expected)?;
        if &found == token {
            Ok(())
        } else {
            Err(ParseError::Unexpected {
                expected: expected.to_string(),
                found: found.describe(),
                offset,
            })
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        let (found, offset) = self.next("identifier")?;
        match found {
            Token::Ident(name) => Ok(name),
            other => Err(ParseError::Unexpected {
                expected: "identifier".to_string(),
                found: other.describe(),
                offset,
            }),
        }
    }

    fn expect_integer(&mut self) -> ParseResult<u64> {
        let (found, offset) = self.next("integer")?;
        match found {
            Token::Integer(value) => Ok(value),
            other => Err(ParseError::Unexpected {
                expected: "integer".to_string(),
                found: other.describe(),
                offset,
            }),
        }
    }

    fn run(mut self) -> ParseResult<Circuit> {
        if self.peek() == Some(&Token::OpenQasm) {
            self.parse_version()?;
        }
        while self.peek().is_some() {
            self.parse_statement()?;
        }
        Ok(self.circuit)
    }

    fn parse_version(&mut self) -> ParseResult<()> {
        self.expect(&Token::OpenQasm, "OPENQASM")?;
        let (found, offset) = self.next("version number")?;
        match found {
            Token::Float(_) | Token::Integer(_) => {}
            other => {
                return Err(ParseError::Unexpected {
                    expected: "version number".to_string(),
                    found: other.describe(),
                    offset,
                });
            }
        }
        self.expect(&Token::Semicolon, "';'")
    }

    fn parse_statement(&mut self) -> ParseResult<()> {
        match self.peek() {
            Some(Token::Include) => {
                self.next("include")?;
                let (found, offset) = self.next("file name")?;
                if !matches!(found, Token::QuotedString(_)) {
                    return Err(ParseError::Unexpected {
                        expected: "file name".to_string(),
                        found: found.describe(),
                        offset,
                    });
                }
                self.expect(&Token::Semicolon, "';'")
            }
            Some(Token::Qubit) => {
                self.next("qubit")?;
                let size = if self.peek() == Some(&Token::LBracket) {
                    self.next("'['")?;
                    let size = self.expect_integer()?;
                    self.expect(&Token::RBracket, "']'")?;
                    size
                } else {
                    1
                };
                let name = self.expect_ident()?;
                self.expect(&Token::Semicolon, "';'")?;
                self.declare_qreg(name, size)
            }
            Some(Token::Bit) => {
                self.next("bit")?;
                let size = if self.peek() == Some(&Token::LBracket) {
                    self.next("'['")?;
                    let size = self.expect_integer()?;
                    self.expect(&Token::RBracket, "']'")?;
                    size
                } else {
                    1
                };
                let name = self.expect_ident()?;
                self.expect(&Token::Semicolon, "';'")?;
                self.declare_creg(name, size)
            }
            Some(Token::Qreg) => {
                self.next("qreg")?;
                let name = self.expect_ident()?;
                self.expect(&Token::LBracket, "'['")?;
                let size = self.expect_integer()?;
                self.expect(&Token::RBracket, "']'")?;
                self.expect(&Token::Semicolon, "';'")?;
                self.declare_qreg(name, size)
            }
            Some(Token::Creg) => {
                self.next("creg")?;
                let name = self.expect_ident()?;
                self.expect(&Token::LBracket, "'['")?;
                let size = self.expect_integer()?;
                self.expect(&Token::RBracket, "']'")?;
                self.expect(&Token::Semicolon, "';'")?;
                self.declare_creg(name, size)
            }
            Some(Token::Measure) => {
                // Legacy form: measure q -> c;
                self.next("measure")?;
                let source = self.parse_operand()?;
                self.expect(&Token::Arrow, "'->'")?;
                let target = self.parse_operand()?;
                self.expect(&Token::Semicolon, "';'")?;
                self.apply_measure(&source, &target)
            }
            Some(Token::Barrier) => {
                self.next("barrier")?;
                let mut qubits = Vec::new();
                if self.peek() != Some(&Token::Semicolon) {
                    loop {
                        let operand = self.parse_operand()?;
                        qubits.extend(self.resolve_qubits(&operand)?);
                        if self.peek() == Some(&Token::Comma) {
                            self.next("','")?;
                        } else {
                            break;
                        }
                    }
                } else {
                    qubits = self.circuit.qubits().iter().map(|q| q.id).collect();
                }
                self.expect(&Token::Semicolon, "';'")?;
                self.circuit.apply(Instruction::barrier(qubits))?;
                Ok(())
            }
            Some(Token::Reset) => {
                self.next("reset")?;
                let operand = self.parse_operand()?;
                self.expect(&Token::Semicolon, "';'")?;
                for qubit in self.resolve_qubits(&operand)? {
                    self.circuit.apply(Instruction::reset(qubit))?;
                }
                Ok(())
            }
            Some(Token::Ident(_)) => self.parse_ident_statement(),
            Some(_) => {
                let (found, offset) = self.next("statement")?;
                Err(ParseError::Unexpected {
                    expected: "statement".to_string(),
                    found: found.describe(),
                    offset,
                })
            }
            None => Ok(()),
        }
    }

    /// Either `c = measure q;` or a gate call.
    fn parse_ident_statement(&mut self) -> ParseResult<()> {
        let target = self.parse_operand()?;
        if self.peek() == Some(&Token::Equals) {
            self.next("'='")?;
            self.expect(&Token::Measure, "measure")?;
            let source = self.parse_operand()?;
            self.expect(&Token::Semicolon, "';'")?;
            return self.apply_measure(&source, &target);
        }

        // Gate call: the "target" we just read is the gate name.
        let Operand::Whole(gate_name) = target else {
            return Err(ParseError::UnknownGate("<indexed>".to_string()));
        };

        let mut params = Vec::new();
        if self.peek() == Some(&Token::LParen) {
            self.next("'('")?;
            loop {
                params.push(self.parse_expr()?);
                if self.peek() == Some(&Token::Comma) {
                    self.next("','")?;
                } else {
                    break;
                }
            }
            self.expect(&Token::RParen, "')'")?;
        }

        let mut operands = Vec::new();
        loop {
            let operand = self.parse_operand()?;
            operands.push(self.resolve_qubits(&operand)?);
            if self.peek() == Some(&Token::Comma) {
                self.next("','")?;
            } else {
                break;
            }
        }
        self.expect(&Token::Semicolon, "';'")?;

        self.apply_gate(&gate_name, &params, &operands)
    }

    fn parse_operand(&mut self) -> ParseResult<Operand> {
        let name = self.expect_ident()?;
        if self.peek() == Some(&Token::LBracket) {
            self.next("'['")?;
            let index = self.expect_integer()?;
            self.expect(&Token::RBracket, "']'")?;
            Ok(Operand::Indexed(name, index))
        } else {
            Ok(Operand::Whole(name))
        }
    }

    fn declare_qreg(&mut self, name: String, size: u64) -> ParseResult<()> {
        let start = u32::try_from(self.circuit.num_qubits()).unwrap_or(u32::MAX);
        let size = u32::try_from(size).unwrap_or(u32::MAX);
        self.circuit.add_qreg(&name, size);
        self.qregs.insert(name, Register { start, size });
        Ok(())
    }

    fn declare_creg(&mut self, name: String, size: u64) -> ParseResult<()> {
        let start = u32::try_from(self.circuit.num_clbits()).unwrap_or(u32::MAX);
        let size = u32::try_from(size).unwrap_or(u32::MAX);
        self.circuit.add_creg(&name, size);
        self.cregs.insert(name, Register { start, size });
        Ok(())
    }

    fn resolve_qubits(&self, operand: &Operand) -> ParseResult<Vec<QubitId>> {
        let (name, index) = match operand {
            Operand::Whole(name) => (name, None),
            Operand::Indexed(name, index) => (name, Some(*index)),
        };
        let register = self
            .qregs
            .get(name)
            .ok_or_else(|| ParseError::UnknownRegister(name.clone()))?;
        resolve(register, name, index).map(|ids| ids.into_iter().map(QubitId).collect())
    }

    fn resolve_clbits(&self, operand: &Operand) -> ParseResult<Vec<ClbitId>> {
        let (name, index) = match operand {
            Operand::Whole(name) => (name, None),
            Operand::Indexed(name, index) => (name, Some(*index)),
        };
        let register = self
            .cregs
            .get(name)
            .ok_or_else(|| ParseError::UnknownRegister(name.clone()))?;
        resolve(register, name, index).map(|ids| ids.into_iter().map(ClbitId).collect())
    }

    fn apply_measure(&mut self, source: &Operand, target: &Operand) -> ParseResult<()> {
        let qubits = self.resolve_qubits(source)?;
        let clbits = self.resolve_clbits(target)?;
        if qubits.len() != clbits.len() {
            return Err(ParseError::BroadcastMismatch {
                gate: "measure".to_string(),
            });
        }
        for (qubit, clbit) in qubits.into_iter().zip(clbits) {
            self.circuit.apply(Instruction::measure(qubit, clbit))?;
        }
        Ok(())
    }

    fn apply_gate(
        &mut self,
        name: &str,
        params: &[f64],
        operands: &[Vec<QubitId>],
    ) -> ParseResult<()> {
        let gate = make_gate(name, params)?;
        let arity = gate.num_qubits();
        if operands.len() != arity as usize {
            return Err(ParseError::WrongArity {
                gate: name.to_string(),
                expected: arity,
                got: operands.len(),
            });
        }

        let broadcast = operands.iter().map(Vec::len).max().unwrap_or(1);
        for operand in operands {
            if operand.len() != 1 && operand.len() != broadcast {
                return Err(ParseError::BroadcastMismatch {
                    gate: name.to_string(),
                });
            }
        }

        for i in 0..broadcast {
            let qubits: Vec<QubitId> = operands
                .iter()
                .map(|ids| if ids.len() == 1 { ids[0] } else { ids[i] })
                .collect();
            self.circuit.apply(Instruction::gate(gate.clone(), qubits))?;
        }
        Ok(())
    }

    // Expression grammar: sums of products with unary sign and `pi`.

    fn parse_expr(&mut self) -> ParseResult<f64> {
        let mut value = self.parse_term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.next("'+'")?;
                    value += self.parse_term()?;
                }
                Some(Token::Minus) => {
                    self.next("'-'")?;
                    value -= self.parse_term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_term(&mut self) -> ParseResult<f64> {
        let mut value = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.next("'*'")?;
                    value *= self.parse_unary()?;
                }
                Some(Token::Slash) => {
                    self.next("'/'")?;
                    value /= self.parse_unary()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn parse_unary(&mut self) -> ParseResult<f64> {
        match self.peek() {
            Some(Token::Minus) => {
                self.next("'-'")?;
                Ok(-self.parse_unary()?)
            }
            Some(Token::Plus) => {
                self.next("'+'")?;
                self.parse_unary()
            }
            _ => self.parse_atom(),
        }
    }

    // u64 -> f64 is lossy above 2^53; angle literals never get there.
    #[allow(clippy::cast_precision_loss)]
    fn parse_atom(&mut self) -> ParseResult<f64> {
        let (found, offset) = self.next("expression")?;
        match found {
            Token::Pi => Ok(PI),
            Token::Float(value) => Ok(value),
            Token::Integer(value) => Ok(value as f64),
            Token::LParen => {
                let value = self.parse_expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(value)
            }
            other => Err(ParseError::Unexpected {
                expected: "expression".to_string(),
                found: other.describe(),
                offset,
            }),
        }
    }
}

fn resolve(register: &Register, name: &str, index: Option<u64>) -> ParseResult<Vec<u32>> {
    match index {
        Some(index) => {
            if index >= u64::from(register.size) {
                return Err(ParseError::IndexOutOfRange {
                    register: name.to_string(),
                    index,
                    size: register.size,
                });
            }
            Ok(vec![register.start + u32::try_from(index).expect("checked against u32 size")])
        }
        None => Ok((register.start..register.start + register.size).collect()),
    }
}

fn make_gate(name: &str, params: &[f64]) -> ParseResult<StandardGate> {
    use StandardGate as G;

    let fixed = |gate: G| {
        if params.is_empty() {
            Ok(gate)
        } else {
            Err(ParseError::WrongParamCount {
                gate: name.to_string(),
                expected: 0,
                got: params.len(),
            })
        }
    };
    let one_param = |make: fn(f64) -> G| {
        if params.len() == 1 {
            Ok(make(params[0]))
        } else {
            Err(ParseError::WrongParamCount {
                gate: name.to_string(),
                expected: 1,
                got: params.len(),
            })
        }
    };

    match name {
        "id" => fixed(G::I),
        "x" => fixed(G::X),
        "y" => fixed(G::Y),
        "z" => fixed(G::Z),
        "h" => fixed(G::H),
        "s" => fixed(G::S),
        "sdg" => fixed(G::Sdg),
        "t" => fixed(G::T),
        "tdg" => fixed(G::Tdg),
        "sx" => fixed(G::SX),
        "sxdg" => fixed(G::SXdg),
        "cx" | "CX" => fixed(G::CX),
        "cy" => fixed(G::CY),
        "cz" => fixed(G::CZ),
        "ch" => fixed(G::CH),
        "swap" => fixed(G::Swap),
        "iswap" => fixed(G::ISwap),
        "ccx" => fixed(G::CCX),
        "cswap" => fixed(G::CSwap),
        "rx" => one_param(G::Rx),
        "ry" => one_param(G::Ry),
        "rz" => one_param(G::Rz),
        "p" | "u1" => one_param(G::P),
        "crx" => one_param(G::CRx),
        "cry" => one_param(G::CRy),
        "crz" => one_param(G::CRz),
        "cp" | "cu1" => one_param(G::CP),
        "rzz" => one_param(G::RZZ),
        "u" | "u3" => {
            if params.len() == 3 {
                Ok(G::U(params[0], params[1], params[2]))
            } else {
                Err(ParseError::WrongParamCount {
                    gate: name.to_string(),
                    expected: 3,
                    got: params.len(),
                })
            }
        }
        "u2" => {
            if params.len() == 2 {
                Ok(G::U(PI / 2.0, params[0], params[1]))
            } else {
                Err(ParseError::WrongParamCount {
                    gate: name.to_string(),
                    expected: 2,
                    got: params.len(),
                })
            }
        }
        _ => Err(ParseError::UnknownGate(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_program() {
        let circuit = parse(
            r#"
            OPENQASM 3.0;
            include "stdgates.inc";
            qubit[2] q;
            bit[2] c;
            h q[0];
            cx q[0], q[1];
            c[0] = measure q[0];
            c[1] = measure q[1];
            "#,
        )
        .unwrap();

        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.num_clbits(), 2);
        assert_eq!(circuit.dag().num_ops(), 4);
        assert_eq!(circuit.depth(), 3);
    }

    #[test]
    fn test_parse_legacy_qasm2() {
        let circuit = parse(
            r#"
            OPENQASM 2.0;
            include "qelib1.inc";
            qreg q[2];
            creg c[2];
            h q[0];
            cx q[0], q[1];
            measure q[0] -> c[0];
            "#,
        )
        .unwrap();

        assert_eq!(circuit.num_qubits(), 2);
        assert_eq!(circuit.dag().num_ops(), 3);
    }

    #[test]
    fn test_parse_parameterized_gates() {
        let circuit = parse(
            r"
            OPENQASM 3.0;
            qubit[1] q;
            rx(pi/2) q[0];
            rz(-pi/4) q[0];
            u(0.1, 0.2, 0.3) q[0];
            ",
        )
        .unwrap();

        let insts = circuit.dag().instructions();
        assert_eq!(insts.len(), 3);
        assert_eq!(insts[0].as_standard_gate(), Some(&StandardGate::Rx(PI / 2.0)));
        assert_eq!(insts[1].as_standard_gate(), Some(&StandardGate::Rz(-PI / 4.0)));
    }

    #[test]
    fn test_whole_register_broadcast() {
        let circuit = parse(
            r"
            OPENQASM 3.0;
            qubit[3] q;
            h q;
            ",
        )
        .unwrap();

        assert_eq!(circuit.dag().num_ops(), 3);
    }

    #[test]
    fn test_measure_whole_register() {
        let circuit = parse(
            r"
            OPENQASM 3.0;
            qubit[2] q;
            bit[2] c;
            c = measure q;
            ",
        )
        .unwrap();

        assert_eq!(circuit.dag().num_ops(), 2);
    }

    #[test]
    fn test_barrier_forms() {
        let circuit = parse(
            r"
            OPENQASM 3.0;
            qubit[2] q;
            barrier q[0], q[1];
            barrier;
            barrier q;
            ",
        )
        .unwrap();

        assert_eq!(circuit.dag().num_ops(), 3);
    }

    #[test]
    fn test_unknown_gate_rejected() {
        let result = parse(
            r"
            OPENQASM 3.0;
            qubit[1] q;
            warp q[0];
            ",
        );
        assert!(matches!(result, Err(ParseError::UnknownGate(name)) if name == "warp"));
    }

    #[test]
    fn test_unknown_register_rejected() {
        let result = parse(
            r"
            OPENQASM 3.0;
            qubit[1] q;
            h r[0];
            ",
        );
        assert!(matches!(result, Err(ParseError::UnknownRegister(name)) if name == "r"));
    }

    #[test]
    fn test_index_out_of_range_rejected() {
        let result = parse(
            r"
            OPENQASM 3.0;
            qubit[2] q;
            h q[5];
            ",
        );
        assert!(matches!(result, Err(ParseError::IndexOutOfRange { .. })));
    }

    #[test]
    fn test_bad_syntax_rejected() {
        let result = parse("OPENQASM 3.0; qubit[2] q; h q[0]");
        assert!(matches!(result, Err(ParseError::UnexpectedEof { .. })));
    }
}
