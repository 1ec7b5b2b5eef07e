use lumber_optimizer::job::Job;
use lumber_optimizer::types::{Dimensions, FitQuality, Unit};
use lumber_optimizer::{
    FinishedPart, OptimizationResult, OptimizeError, OptimizerConfig, RawStock, Settings, Solver,
    optimize,
};

fn mm(thickness_allowance: f64, width_allowance: f64, kerf: f64) -> Settings {
    Settings::new(thickness_allowance, width_allowance, kerf, Unit::Mm)
}

/// Every part is cut to its full quantity or listed unmatchable, never both.
fn assert_conserved(result: &OptimizationResult, parts: &[FinishedPart]) {
    for part in parts {
        let units = result.units_for(&part.id);
        if result.unmatchable_parts.contains(&part.name) {
            assert_eq!(units, 0, "{} is unmatchable but has cuts", part.name);
        } else {
            assert_eq!(units, part.quantity, "{} not fully cut", part.name);
        }
    }
    let volume: f64 = result.plan.iter().map(|l| l.volume()).sum();
    assert!((volume - result.total_raw_volume).abs() < 1e-6);
}

#[test]
fn test_glued_panels_reuse_offcut() {
    let parts = vec![
        FinishedPart::new("a", "Side A", 1, Dimensions::new(18.0, 90.0, 600.0)),
        FinishedPart::new("b", "Side B", 1, Dimensions::new(18.0, 90.0, 600.0)),
    ];
    let stocks = vec![RawStock::new("s", "1x3", Dimensions::new(25.0, 70.0, 2400.0))];
    let result = optimize(&parts, &stocks, mm(5.0, 5.0, 3.0)).unwrap();
    assert_conserved(&result, &parts);

    let cuts = &result.plan[0].cuts;
    let strips: u32 = cuts.iter().map(|c| c.strips()).sum();
    assert_eq!(strips, 3);
    assert!(cuts.iter().all(|c| c.glue_layer));
    assert!(cuts.iter().all(|c| c.part_name.ends_with(" (Glue Layer)")));
    assert_eq!(result.assignments[1].offcuts_consumed, 1);
}

#[test]
fn test_mixed_job_from_json() {
    let job = Job::from_json(
        r#"{
            "parts": [
                {"id": "leg", "name": "Leg", "quantity": 4, "thickness": 40, "width": 40, "length": 720},
                {"id": "top", "name": "Top", "quantity": 1, "thickness": 25, "width": 400, "length": 1200},
                {"id": "apron", "name": "Apron", "quantity": 4, "thickness": 20, "width": 80, "length": 900},
                {"id": "beam", "name": "Beam", "quantity": 1, "thickness": 40, "width": 90, "length": 4000}
            ],
            "stocks": [
                {"id": "2x4", "name": "2x4", "thickness": 45, "width": 89, "length": 2440},
                {"id": "1x6", "name": "1x6", "thickness": 30, "width": 140, "length": 2440},
                {"id": "2x8", "name": "2x8", "thickness": 45, "width": 184, "length": 3600}
            ],
            "settings": {"thicknessAllowance": 3, "widthAllowance": 5, "kerf": 3, "unit": "mm"}
        }"#,
    )
    .unwrap();
    let result = job.run().unwrap();
    assert_conserved(&result, &job.parts);
    assert_eq!(result.unmatchable_parts, vec!["Beam"]);

    let top_cuts: Vec<_> = result
        .plan
        .iter()
        .flat_map(|l| &l.cuts)
        .filter(|c| c.part_id == "top")
        .collect();
    assert!(top_cuts.iter().all(|c| c.glue_layer));

    for line in &result.plan {
        for cut in &line.cuts {
            assert!(cut.length <= line.dimensions.length);
        }
    }

    let json = serde_json::to_value(&result).unwrap();
    assert!(json["plan"][0]["rawStockName"].is_string());
    assert!(json["plan"][0]["quantityNeeded"].is_u64());
    assert!(json["totalRawVolume"].is_number());
    assert_eq!(json["unmatchableParts"][0], "Beam");
}

#[test]
fn test_tight_fit_accepted_when_nothing_better() {
    let parts = vec![FinishedPart::new("r", "Rail", 2, Dimensions::new(20.0, 60.0, 500.0))];
    let stocks = vec![RawStock::new("s", "1x3 s4s", Dimensions::new(21.0, 63.0, 1200.0))];
    let result = optimize(&parts, &stocks, mm(5.0, 5.0, 3.0)).unwrap();
    assert_conserved(&result, &parts);
    assert!(result.unmatchable_parts.is_empty());
    assert_eq!(result.assignments[0].fit, FitQuality::Tight);
    assert!(!result.plan[0].cuts[0].glue_layer);
    assert_eq!(result.plan[0].quantity_needed, 1);
}

#[test]
fn test_identical_inputs_identical_results() {
    let parts: Vec<FinishedPart> = (0..12)
        .map(|i| {
            FinishedPart::new(
                format!("p{i}"),
                format!("Part {i}"),
                1 + i % 3,
                Dimensions::new(15.0 + i as f64, 50.0 + 10.0 * i as f64, 300.0 + 40.0 * i as f64),
            )
        })
        .collect();
    let stocks = vec![
        RawStock::new("a", "1x3", Dimensions::new(25.0, 70.0, 2400.0)),
        RawStock::new("b", "2x4", Dimensions::new(45.0, 89.0, 2440.0)),
        RawStock::new("c", "1x8", Dimensions::new(20.0, 184.0, 3000.0)),
    ];
    let solver = || Solver::new(parts.clone(), stocks.clone(), mm(3.0, 5.0, 3.0));
    let first = solver().solve().unwrap();
    let second = solver().solve().unwrap();
    assert_eq!(first, second);
    assert_conserved(&first, &parts);
}

#[test]
fn test_no_worse_than_one_part_per_run() {
    // Each part alone versus all together: sharing boards and offcuts never
    // costs more volume than planning parts separately.
    let parts = vec![
        FinishedPart::new("a", "A", 3, Dimensions::new(18.0, 90.0, 600.0)),
        FinishedPart::new("b", "B", 2, Dimensions::new(18.0, 60.0, 800.0)),
    ];
    let stocks = vec![RawStock::new("s", "1x3", Dimensions::new(25.0, 70.0, 2400.0))];
    let settings = mm(5.0, 5.0, 3.0);
    let together = optimize(&parts, &stocks, settings).unwrap();
    let separate: f64 = parts
        .iter()
        .map(|p| {
            optimize(std::slice::from_ref(p), &stocks, settings)
                .unwrap()
                .total_raw_volume
        })
        .sum();
    assert!(together.total_raw_volume <= separate + 1e-6);
}

#[test]
fn test_rejects_bad_input() {
    let stocks = vec![RawStock::new("s", "1x3", Dimensions::new(25.0, 70.0, 2400.0))];
    assert!(matches!(
        optimize(&[], &stocks, Settings::default()),
        Err(OptimizeError::InvalidInput(_))
    ));
    let parts = vec![FinishedPart::new("a", "A", 1, Dimensions::new(18.0, 90.0, 600.0))];
    let config = OptimizerConfig::new().with_max_layers(0);
    let result = Solver::new(parts, stocks, Settings::default())
        .with_config(config)
        .solve();
    assert!(matches!(result, Err(OptimizeError::InvalidInput(_))));
}
