//! Text rendering of circuits.
//!
//! One column per instruction, one line per qubit. Barrier labels are
//! printed on a header line above their column.

use crate::quantum::circuit::{Instruction, QuantumCircuit};
use crate::quantum::gate::{QuantumGate, StandardGate};

const WIRE: char = '─';

/// Render `circuit` as a multi-line text diagram.
pub fn render(circuit: &QuantumCircuit) -> String {
    let n = circuit.qubit_count;
    let prefixes: Vec<String> = (0..n).map(|q| format!("q{}: ", q)).collect();
    let prefix_width = prefixes.iter().map(|p| width(p)).max().unwrap_or(0);

    let mut header = " ".repeat(prefix_width);
    let mut wires: Vec<String> = prefixes
        .iter()
        .map(|p| format!("{}{}", p, " ".repeat(prefix_width - width(p))))
        .collect();

    for instruction in &circuit.instructions {
        let (label, cells) = match instruction {
            Instruction::Gate { gate, qubits } => (String::new(), gate_column(&**gate, qubits, n)),
            Instruction::Barrier { label } => (label.clone(), vec![format!("{0}░{0}", WIRE); n]),
        };

        let column_width = cells
            .iter()
            .map(|c| width(c))
            .chain(std::iter::once(width(&label)))
            .max()
            .unwrap_or(0);

        header.push_str(&label);
        header.push_str(&" ".repeat(column_width - width(&label)));

        for (wire, cell) in wires.iter_mut().zip(cells) {
            let pad = column_width - width(&cell);
            wire.push_str(&cell);
            wire.extend(std::iter::repeat(WIRE).take(pad));
        }
    }

    let mut lines = Vec::with_capacity(n + 1);
    let header = header.trim_end();
    if !header.is_empty() {
        lines.push(header.to_string());
    }
    for mut wire in wires {
        wire.push(WIRE);
        lines.push(wire);
    }

    lines.join("\n")
}

fn gate_column(gate: &dyn QuantumGate, qubits: &[usize], n: usize) -> Vec<String> {
    let mut symbols: Vec<Option<String>> = vec![None; n];

    match gate.as_any().downcast_ref::<StandardGate>() {
        Some(StandardGate::CNOT) => {
            symbols[qubits[0]] = Some("■".to_string());
            symbols[qubits[1]] = Some("⊕".to_string());
        }
        Some(StandardGate::SWAP) => {
            symbols[qubits[0]] = Some("×".to_string());
            symbols[qubits[1]] = Some("×".to_string());
        }
        _ => {
            for &q in qubits {
                symbols[q] = Some(gate.name());
            }
        }
    }

    // Vertical connector through spectator qubits of a multi-qubit gate
    if qubits.len() > 1 {
        let lo = qubits.iter().copied().min().unwrap_or(0);
        let hi = qubits.iter().copied().max().unwrap_or(0);
        for symbol in symbols.iter_mut().take(hi).skip(lo + 1) {
            if symbol.is_none() {
                *symbol = Some("┼".to_string());
            }
        }
    }

    symbols
        .into_iter()
        .map(|s| match s {
            Some(s) => format!("{0}{1}{0}", WIRE, s),
            None => WIRE.to_string().repeat(3),
        })
        .collect()
}

fn width(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use crate::quantum::circuit::CircuitBuilder;

    #[test]
    fn test_encoding_circuit_diagram() {
        let mut builder = CircuitBuilder::new(3);
        builder.x(0).unwrap().cnot(0, 1).unwrap().cnot(0, 2).unwrap();

        let expected = [
            "q0: ─X──■──■──",
            "q1: ────⊕──┼──",
            "q2: ───────⊕──",
        ]
        .join("\n");

        assert_eq!(builder.build().draw(), expected);
    }

    #[test]
    fn test_barrier_labels_go_on_header_line() {
        let mut builder = CircuitBuilder::new(2);
        builder.barrier("Encode");
        let drawn = builder.build().draw();
        let lines: Vec<&str> = drawn.lines().collect();

        assert_eq!(lines[0], "    Encode");
        assert_eq!(lines[1], "q0: ─░─────");
        assert_eq!(lines.len(), 3);
    }
}
