// src/circuits/draw.rs

//! Text rendering of circuits, one column per operation.

use super::Circuit;
use crate::operations::Operation;

const GATE_WIDTH: usize = 7; // e.g., "───H───"
const Q_WIRE: char = '─';
const C_WIRE: char = '═';
const V_WIRE: char = '│';
const V_CLASSICAL: char = '║';

/// Centers `symbol` in a `GATE_WIDTH` cell padded with `fill`.
fn format_cell(symbol: &str, fill: char) -> String {
    let slen = symbol.chars().count();
    if slen >= GATE_WIDTH {
        return symbol.chars().take(GATE_WIDTH).collect();
    }
    let total = GATE_WIDTH - slen;
    let pre = total / 2;
    let post = total - pre;
    format!("{}{}{}", fill.to_string().repeat(pre), symbol, fill.to_string().repeat(post))
}

struct Grid {
    cells: Vec<Vec<String>>,
    /// `connect[r][t]` is drawn in the gap below row `r`.
    connect: Vec<Vec<char>>,
    num_qubits: usize,
}

impl Grid {
    fn new(num_qubits: usize, num_clbits: usize, num_ops: usize) -> Self {
        let q_wire = Q_WIRE.to_string().repeat(GATE_WIDTH);
        let c_wire = C_WIRE.to_string().repeat(GATE_WIDTH);
        let mut cells = vec![vec![q_wire; num_ops]; num_qubits];
        cells.extend(vec![vec![c_wire; num_ops]; num_clbits]);
        let connect = vec![vec![' '; num_ops]; num_qubits + num_clbits];
        Self { cells, connect, num_qubits }
    }

    fn link(&mut self, t: usize, a: usize, b: usize, ch: char) {
        let (lo, hi) = (a.min(b), a.max(b));
        for row in self.connect.iter_mut().take(hi).skip(lo) {
            row[t] = ch;
        }
    }

    fn place(&mut self, op: &Operation, t: usize) {
        match op {
            Operation::Gate { gate, target } => {
                self.cells[target.0][t] = format_cell(gate.symbol(), Q_WIRE);
            }
            Operation::Controlled { gate, control, target } => {
                self.cells[control.0][t] = format_cell("@", Q_WIRE);
                self.cells[target.0][t] = format_cell(gate.symbol(), Q_WIRE);
                self.link(t, control.0, target.0, V_WIRE);
            }
            Operation::Measure { qubit, clbit } => {
                let c_row = self.num_qubits + clbit.0;
                self.cells[qubit.0][t] = format_cell("M", Q_WIRE);
                self.cells[c_row][t] = format_cell("╩", C_WIRE);
                self.link(t, qubit.0, c_row, V_CLASSICAL);
            }
            Operation::Barrier { qubits } => {
                for q in qubits {
                    self.cells[q.0][t] = format_cell("░", Q_WIRE);
                }
            }
            Operation::Conditioned { condition, op } => {
                self.place(op, t);
                let c_row = self.num_qubits + condition.clbit.0;
                self.cells[c_row][t] = format_cell(&format!("■={}", condition.value), C_WIRE);
                if let Some(bottom) = op.involved_qubits().iter().map(|q| q.0).max() {
                    self.link(t, bottom, c_row, V_CLASSICAL);
                }
            }
        }
    }
}

impl Circuit {
    /// Renders the circuit as text.
    ///
    /// Qubit wires come first, then classical wires, each labelled
    /// `<register>_<index>`. With `fold = Some(n)` the diagram is wrapped
    /// every `n` operation columns.
    pub fn draw(&self, fold: Option<usize>) -> String {
        let mut lines = vec![format!(
            "qteleport::Circuit[{} operations on {} qubits, {} clbits]",
            self.operations.len(),
            self.num_qubits,
            self.num_clbits
        )];

        let mut labels: Vec<String> = Vec::new();
        for reg in &self.qregs {
            labels.extend((0..reg.size()).map(|i| format!("{}_{}", reg.name(), i)));
        }
        for reg in &self.cregs {
            labels.extend((0..reg.size()).map(|i| format!("{}_{}", reg.name(), i)));
        }
        let num_rows = labels.len();
        if num_rows == 0 {
            return lines.join("\n") + "\n";
        }
        let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;

        // An empty circuit still shows its wires.
        let num_cols = self.operations.len().max(1);
        let mut grid = Grid::new(self.num_qubits, self.num_clbits, num_cols);
        for (t, op) in self.operations.iter().enumerate() {
            grid.place(op, t);
        }

        let fold = fold.filter(|f| *f > 0).unwrap_or(num_cols);
        let starts: Vec<usize> = (0..num_cols).step_by(fold).collect();
        for (chunk, &start) in starts.iter().enumerate() {
            let end = (start + fold).min(num_cols);
            let first = chunk == 0;
            let last = chunk + 1 == starts.len();
            if !first {
                lines.push(String::new());
            }
            for r in 0..num_rows {
                let label = format!("{}: ", labels[r]);
                let mut line = format!("{:<width$}", label, width = label_width);
                if !first {
                    line.push('«');
                }
                line.push_str(&grid.cells[r][start..end].join(""));
                if !last {
                    line.push('»');
                }
                lines.push(line);

                if r + 1 < num_rows {
                    let mut gap = " ".repeat(label_width);
                    if !first {
                        gap.push(' ');
                    }
                    for t in start..end {
                        let pad = GATE_WIDTH - 1;
                        let pre = pad / 2;
                        gap.push_str(&" ".repeat(pre));
                        gap.push(grid.connect[r][t]);
                        gap.push_str(&" ".repeat(pad - pre));
                    }
                    lines.push(gap.trim_end().to_string());
                }
            }
        }
        lines.join("\n") + "\n"
    }
}

#[cfg(test)]
mod tests {
    use crate::circuits::CircuitBuilder;

    #[test]
    fn test_format_cell_centers_symbol() {
        assert_eq!(super::format_cell("H", '─'), "───H───");
        assert_eq!(super::format_cell("■=1", '═'), "══■=1══");
    }

    #[test]
    fn test_draw_labels_and_symbols() {
        let circuit = CircuitBuilder::with_size(2, 1).h(0).cx(0, 1).measure(1, 0).build().unwrap();
        let text = circuit.draw(None);
        assert!(text.starts_with("qteleport::Circuit[3 operations on 2 qubits, 1 clbits]"));
        assert!(text.contains("q_0: "));
        assert!(text.contains("q_1: "));
        assert!(text.contains("c_0: "));
        assert!(text.contains("───H───"));
        assert!(text.contains("───@───"));
        assert!(text.contains("───M───"));
        assert!(text.contains("═══╩═══"));
    }

    #[test]
    fn test_draw_conditioned_gate() {
        let circuit = CircuitBuilder::with_size(1, 1).measure(0, 0).x(0).c_if(0, 1).build().unwrap();
        let text = circuit.draw(None);
        assert!(text.contains("══■=1══"));
    }

    #[test]
    fn test_draw_fold_wraps_columns() {
        let circuit = CircuitBuilder::with_size(1, 0).h(0).x(0).z(0).build().unwrap();
        let text = circuit.draw(Some(2));
        let q_lines: Vec<&str> = text.lines().filter(|l| l.starts_with("q_0")).collect();
        assert_eq!(q_lines.len(), 2);
        assert!(q_lines[0].ends_with('»'));
        assert!(q_lines[1].contains('«'));
    }

    #[test]
    fn test_display_matches_unfolded_draw() {
        let circuit = CircuitBuilder::with_size(1, 1).h(0).measure(0, 0).build().unwrap();
        assert_eq!(circuit.to_string(), circuit.draw(None));
    }
}
