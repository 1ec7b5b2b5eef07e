use std::fmt::Write;

use crate::types::{BoardLayout, OptimizationResult, Unit};

const MAX_WIDTH: f64 = 80.0;

/// Draws one board as a three-line bar: pieces in order, then hatched waste.
pub fn render_board(board_length: f64, layout: &BoardLayout) -> String {
    let scale = MAX_WIDTH / board_length;
    let grid_w = (board_length * scale).round() as usize;
    if grid_w == 0 {
        return String::new();
    }

    let mut grid = vec![vec![' '; grid_w + 1]; 3];
    draw_segment(&mut grid, 0, grid_w);

    let mut x = 0.0;
    for piece in &layout.pieces {
        let sx = (x * scale).round() as usize;
        let sw = (piece.length * scale).round() as usize;
        x += piece.length;
        if sw == 0 {
            continue;
        }
        draw_segment(&mut grid, sx, sw);
        write_label(&mut grid, sx, sw, &piece.part_name);
    }

    let used_end = (layout.used_length * scale).round() as usize;
    for cell in grid[1].iter_mut().take(grid_w).skip(used_end + 1) {
        *cell = '/';
    }

    let mut result = String::new();
    for row in &grid {
        let line: String = row.iter().collect();
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}

fn draw_segment(grid: &mut [Vec<char>], x: usize, w: usize) {
    let cols = grid[0].len();
    for i in x..=x + w {
        if i >= cols {
            break;
        }
        let edge = i == x || i == x + w;
        grid[0][i] = if edge { '+' } else { '-' };
        grid[2][i] = if edge { '+' } else { '-' };
        if edge {
            grid[1][i] = '|';
        }
    }
}

fn write_label(grid: &mut [Vec<char>], sx: usize, sw: usize, label: &str) {
    if sw < 3 {
        return;
    }
    let room = sw - 1;
    let chars: Vec<char> = label.chars().take(room).collect();
    let start = sx + 1 + (room - chars.len()) / 2;
    for (i, &ch) in chars.iter().enumerate() {
        if let Some(cell) = grid[1].get_mut(start + i) {
            *cell = ch;
        }
    }
}

/// Shopping list and cut plan as plain text.
pub fn render_plan(result: &OptimizationResult, unit: Unit, layout: bool) -> String {
    let sym = unit.symbol();
    let mut out = String::new();
    let _ = writeln!(out, "Dimensions in {}", unit.label());
    let _ = writeln!(out);

    if !result.unmatchable_parts.is_empty() {
        let _ = writeln!(out, "Unmatchable parts:");
        for name in &result.unmatchable_parts {
            let _ = writeln!(out, "  {name}");
        }
        let _ = writeln!(out);
    }

    for line in &result.plan {
        let d = line.dimensions;
        let _ = writeln!(
            out,
            "{} ({} x {} x {} {sym}): buy {}",
            line.raw_stock_name, d.thickness, d.width, d.length, line.quantity_needed
        );
        for cut in &line.cuts {
            let glue = if cut.glue_layer { " [glued]" } else { "" };
            let _ = writeln!(
                out,
                "  {} {} {sym} x{} ({} strip{} each){glue}",
                cut.part_name,
                cut.length,
                cut.count,
                cut.layers,
                if cut.layers == 1 { "" } else { "s" },
            );
        }
        if layout {
            for (i, board) in line.boards.iter().enumerate() {
                let _ = writeln!(out, "  Board {}: waste {} {sym}", i + 1, board.waste);
                for row in render_board(d.length, board).lines() {
                    let _ = writeln!(out, "    {row}");
                }
            }
        }
        let _ = writeln!(out, "  Waste: {} {sym}", line.waste);
        let _ = writeln!(out);
    }

    let boards = result.board_count();
    let _ = writeln!(
        out,
        "Summary: {} board{} to buy, {} {sym}\u{b3} raw volume, {} {sym} waste, {} offcut{} left over",
        boards,
        if boards == 1 { "" } else { "s" },
        result.total_raw_volume,
        result.total_waste_length(),
        result.offcuts_discarded,
        if result.offcuts_discarded == 1 { "" } else { "s" },
    );
    out
}
