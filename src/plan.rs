//! Aggregates per-unit decisions into the purchase list.

use crate::cutter::LengthCutter;
use crate::lamination::BlockPlan;
use crate::types::{
    Cut, FinishedPart, GLUE_LAYER_SUFFIX, OptimizationResult, PartAssignment, PlacedPiece,
    RawBoardResult, RawStock,
};

#[derive(Debug, Default)]
struct Line {
    cuts: Vec<Cut>,
    strips: Vec<PlacedPiece>,
}

pub struct PlanAssembler<'a> {
    stocks: &'a [RawStock],
    lines: Vec<Line>,
    assignments: Vec<(usize, PartAssignment)>,
    unmatchable: Vec<String>,
}

impl<'a> PlanAssembler<'a> {
    pub fn new(stocks: &'a [RawStock]) -> Self {
        Self {
            stocks,
            lines: stocks.iter().map(|_| Line::default()).collect(),
            assignments: Vec::new(),
            unmatchable: Vec::new(),
        }
    }

    /// Records one finished unit of `part` made according to `block`.
    pub fn record_unit(&mut self, part: &FinishedPart, block: &BlockPlan) {
        let stocks = self.stocks;
        let stock = &stocks[block.stock_index];
        let line = &mut self.lines[block.stock_index];
        let glue_layer = block.is_glued();
        let layers = block.new_strips();
        let label = if glue_layer {
            format!("{}{}", part.name, GLUE_LAYER_SUFFIX)
        } else {
            part.name.clone()
        };

        match line
            .cuts
            .iter_mut()
            .find(|c| c.part_id == part.id && c.layers == layers && c.glue_layer == glue_layer)
        {
            Some(cut) => cut.count += 1,
            None => line.cuts.push(Cut {
                part_id: part.id.clone(),
                part_name: label.clone(),
                length: part.dimensions.length,
                count: 1,
                layers,
                glue_layer,
            }),
        }

        for _ in 0..layers {
            line.strips.push(PlacedPiece {
                part_name: label.clone(),
                length: part.dimensions.length,
            });
        }

        let offcuts = block.offcuts_used().count() as u32;
        match self
            .assignments
            .iter_mut()
            .find(|(idx, a)| *idx == block.stock_index && a.part_id == part.id)
        {
            Some((_, assignment)) => {
                assignment.units += 1;
                assignment.new_strips += layers;
                assignment.offcuts_consumed += offcuts;
                assignment.fit = assignment.fit.worst(block.quality());
            }
            None => self.assignments.push((
                block.stock_index,
                PartAssignment {
                    part_id: part.id.clone(),
                    part_name: part.name.clone(),
                    raw_stock_id: stock.id.clone(),
                    raw_stock_name: stock.name.clone(),
                    fit: block.quality(),
                    units: 1,
                    new_strips: layers,
                    offcuts_consumed: offcuts,
                },
            )),
        }
    }

    pub fn record_unmatchable(&mut self, part: &FinishedPart) {
        self.unmatchable.push(part.name.clone());
    }

    pub fn finish(self, kerf: f64, offcuts_discarded: usize) -> OptimizationResult {
        let plan: Vec<RawBoardResult> = self
            .stocks
            .iter()
            .zip(self.lines)
            .filter(|(_, line)| !line.cuts.is_empty())
            .map(|(stock, line)| {
                let boards = LengthCutter::new(stock.dimensions.length, kerf).pack(line.strips);
                RawBoardResult {
                    raw_stock_id: stock.id.clone(),
                    raw_stock_name: stock.name.clone(),
                    dimensions: stock.dimensions,
                    cuts: line.cuts,
                    waste: boards.iter().map(|b| b.waste).sum(),
                    quantity_needed: boards.len() as u32,
                    boards,
                }
            })
            .collect();

        let total_raw_volume = plan.iter().map(RawBoardResult::volume).sum();

        let mut unmatchable_parts = self.unmatchable;
        unmatchable_parts.sort();
        unmatchable_parts.dedup();

        OptimizationResult {
            plan,
            unmatchable_parts,
            total_raw_volume,
            assignments: self.assignments.into_iter().map(|(_, a)| a).collect(),
            offcuts_discarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lamination::AxisPlan;
    use crate::types::{Axis, Dimensions, FitQuality};

    fn axis_plan(axis: Axis, raw_strips: u32) -> AxisPlan {
        AxisPlan {
            axis,
            raw_strips,
            offcut: None,
            total: 100.0 * raw_strips as f64,
            finished: 90.0,
            target: 95.0,
            quality: FitQuality::Full,
            laminated: raw_strips > 1,
        }
    }

    fn block(stock_index: usize, width_strips: u32) -> BlockPlan {
        BlockPlan {
            stock_index,
            thickness: axis_plan(Axis::Thickness, 1),
            width: axis_plan(Axis::Width, width_strips),
        }
    }

    #[test]
    fn test_groups_cuts_and_counts_boards() {
        let stocks = vec![
            RawStock::new("s1", "1x4", Dimensions::new(20.0, 90.0, 1000.0)),
            RawStock::new("s2", "1x6", Dimensions::new(20.0, 140.0, 2000.0)),
        ];
        let leg = FinishedPart::new("p1", "Leg", 3, Dimensions::new(18.0, 80.0, 400.0));
        let top = FinishedPart::new("p2", "Top", 1, Dimensions::new(18.0, 150.0, 400.0));

        let mut assembler = PlanAssembler::new(&stocks);
        for _ in 0..3 {
            assembler.record_unit(&leg, &block(0, 1));
        }
        assembler.record_unit(&top, &block(0, 2));
        let result = assembler.finish(0.0, 0);

        assert_eq!(result.plan.len(), 1);
        let line = &result.plan[0];
        assert_eq!(line.raw_stock_id, "s1");
        assert_eq!(line.cuts.len(), 2);
        assert_eq!(line.cuts[0].part_name, "Leg");
        assert_eq!(line.cuts[0].count, 3);
        assert_eq!(line.cuts[1].part_name, "Top (Glue Layer)");
        assert!(line.cuts[1].glue_layer);
        assert_eq!(line.cuts[1].strips(), 2);
        // Five 400 strips, two per 1000 board.
        assert_eq!(line.quantity_needed, 3);
        assert_eq!(line.waste, 200.0 + 200.0 + 600.0);
        assert_eq!(result.total_raw_volume, 20.0 * 90.0 * 1000.0 * 3.0);
        assert_eq!(result.units_for("p1"), 3);
        assert_eq!(result.units_for("p2"), 1);
        assert_eq!(result.assignments.len(), 2);
        assert_eq!(result.assignments[1].new_strips, 2);
    }

    #[test]
    fn test_unmatchable_sorted_and_unique() {
        let stocks = vec![RawStock::new("s1", "1x4", Dimensions::new(20.0, 90.0, 1000.0))];
        let mut assembler = PlanAssembler::new(&stocks);
        for name in ["Shelf", "Apron", "Shelf"] {
            let part = FinishedPart::new(name, name, 1, Dimensions::new(1.0, 1.0, 5000.0));
            assembler.record_unmatchable(&part);
        }
        let result = assembler.finish(3.0, 2);
        assert!(result.plan.is_empty());
        assert_eq!(result.unmatchable_parts, vec!["Apron", "Shelf"]);
        assert_eq!(result.total_raw_volume, 0.0);
        assert_eq!(result.offcuts_discarded, 2);
    }
}
