use std::sync::Arc;

use bucket_domain::{Bucket, BucketState, Category, CategoryRegistry, Column};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    month::{ColumnView, MonthPipeline},
    settings::EngineSettings,
    transaction_stage::TransactionTotals,
};

fn state(registry: &Arc<CategoryRegistry>, buckets: &[(&str, Bucket)]) -> BucketState {
    BucketState::from_entries(registry, buckets.iter().copied()).expect("complete snapshot")
}

fn totals(entries: &[(&str, Decimal)]) -> TransactionTotals {
    entries
        .iter()
        .map(|(category, amount)| (Category::from(*category), *amount))
        .collect()
}

#[test]
fn both_buckets_at_capacity_leave_slush_unassigned() {
    let registry = CategoryRegistry::shared(["A", "B"]).unwrap();
    let start = state(
        &registry,
        &[
            ("A", Bucket::new(dec!(90), dec!(100)).critical()),
            ("B", Bucket::new(dec!(90), dec!(100))),
        ],
    );

    let month = MonthPipeline::run(
        &start,
        &totals(&[("A", dec!(30)), ("B", dec!(30))]),
        Decimal::ZERO,
        &EngineSettings::default(),
    )
    .expect("month computes");

    assert_eq!(month.after_t.values(), &[dec!(120), dec!(120)]);
    assert_eq!(month.before_fill.values(), &[dec!(100), dec!(100)]);
    assert_eq!(month.slush, dec!(40));
    assert_eq!(month.crit_to_fill.values(), &[dec!(0), dec!(0)]);
    assert_eq!(month.nc_to_fill.values(), &[dec!(0), dec!(0)]);
    assert_eq!(month.scaled.total(), dec!(0));
    assert_eq!(month.unfilled.total(), dec!(0));
    assert_eq!(month.final_values.values(), &[dec!(100), dec!(100)]);
    assert_eq!(month.leftover_slush, dec!(40));
}

#[test]
fn scarce_slush_scales_non_critical_fill() {
    let registry = CategoryRegistry::shared(["Over", "X", "Y"]).unwrap();
    let start = state(
        &registry,
        &[
            ("Over", Bucket::new(dec!(0), dec!(0))),
            ("X", Bucket::new(dec!(40), dec!(50))),
            ("Y", Bucket::new(dec!(150), dec!(200))),
        ],
    );

    let month = MonthPipeline::run(
        &start,
        &totals(&[("Over", dec!(30))]),
        Decimal::ZERO,
        &EngineSettings::default(),
    )
    .unwrap();

    assert_eq!(month.slush, dec!(30));
    assert_eq!(month.scale_factor, dec!(0.5));
    assert_eq!(month.pre_scale.values(), &[dec!(0), dec!(5), dec!(25)]);
    assert_eq!(month.scaled.values(), &[dec!(0), dec!(5), dec!(25)]);
    assert_eq!(month.final_values.values(), &[dec!(0), dec!(45), dec!(175)]);
    assert_eq!(month.unfilled.values(), &[dec!(0), dec!(5), dec!(25)]);
}

#[test]
fn fractional_scaling_distributes_remainder_units() {
    let registry = CategoryRegistry::shared(["Over", "X", "Y"]).unwrap();
    let start = state(
        &registry,
        &[
            ("Over", Bucket::new(dec!(0), dec!(0))),
            ("X", Bucket::new(dec!(0), dec!(10))),
            ("Y", Bucket::new(dec!(0), dec!(47))),
        ],
    );
    let settings = EngineSettings::default().with_minor_units(0);

    let month =
        MonthPipeline::run(&start, &totals(&[("Over", dec!(20))]), Decimal::ZERO, &settings).unwrap();

    assert_eq!(month.scaled.values(), &[dec!(0), dec!(4), dec!(16)]);
    assert_eq!(month.scaled.total(), dec!(20));
    assert_eq!(month.unfilled.values(), &[dec!(0), dec!(6), dec!(31)]);
}

#[test]
fn critical_buckets_are_filled_before_non_critical() {
    let registry = CategoryRegistry::shared(["Bonus", "Rent", "Fun"]).unwrap();
    let start = state(
        &registry,
        &[
            ("Bonus", Bucket::new(dec!(0), dec!(0))),
            ("Rent", Bucket::new(dec!(900), dec!(1000)).critical()),
            ("Fun", Bucket::new(dec!(0), dec!(100))),
        ],
    );

    let month = MonthPipeline::run(
        &start,
        &totals(&[("Bonus", dec!(150))]),
        Decimal::ZERO,
        &EngineSettings::default(),
    )
    .unwrap();

    assert_eq!(month.crit_filled.values(), &[dec!(0), dec!(1000), dec!(0)]);
    assert_eq!(month.scaled.values(), &[dec!(0), dec!(0), dec!(50)]);
    assert_eq!(month.final_values.values(), &[dec!(0), dec!(1000), dec!(50)]);
    assert_eq!(month.critical_shortfall(), dec!(0));
}

#[test]
fn quiet_month_keeps_start_values() {
    let registry = CategoryRegistry::shared(["Rent", "Fun"]).unwrap();
    let start = state(
        &registry,
        &[
            ("Rent", Bucket::new(dec!(250.75), dec!(1000)).critical()),
            ("Fun", Bucket::new(dec!(-12), dec!(100))),
        ],
    );

    let month = MonthPipeline::run(
        &start,
        &TransactionTotals::new(),
        Decimal::ZERO,
        &EngineSettings::default(),
    )
    .unwrap();
    assert_eq!(month.final_values, month.start);
    assert_eq!(month.slush, dec!(0));
}

#[test]
fn carried_slush_joins_the_pool() {
    let registry = CategoryRegistry::shared(["Fun"]).unwrap();
    let start = state(&registry, &[("Fun", Bucket::new(dec!(0), dec!(100)))]);

    let month = MonthPipeline::run(
        &start,
        &TransactionTotals::new(),
        dec!(30),
        &EngineSettings::default(),
    )
    .unwrap();
    assert_eq!(month.extracted_slush, dec!(0));
    assert_eq!(month.carried_in, dec!(30));
    assert_eq!(month.slush, dec!(30));
    assert_eq!(month.final_values.values(), &[dec!(30)]);
}

#[test]
fn column_views_follow_pipeline_order() {
    let registry = CategoryRegistry::shared(["Fun"]).unwrap();
    let start = state(&registry, &[("Fun", Bucket::new(dec!(10), dec!(20)))]);
    let month = MonthPipeline::run(
        &start,
        &TransactionTotals::new(),
        Decimal::ZERO,
        &EngineSettings::default(),
    )
    .unwrap();

    let columns: Vec<Column> = month.columns().map(|(column, _)| column).collect();
    assert_eq!(columns, Column::ALL);
    assert_eq!(month.column(Column::Slush), ColumnView::Scalar(dec!(0)));
    assert!(matches!(month.column(Column::IsCrit), ColumnView::Flags(flags) if flags.values() == [false]));
}

#[test]
fn month_result_serializes_named_columns() {
    let registry = CategoryRegistry::shared(["Fun"]).unwrap();
    let start = state(&registry, &[("Fun", Bucket::new(dec!(10), dec!(20)))]);
    let month = MonthPipeline::run(
        &start,
        &TransactionTotals::new(),
        Decimal::ZERO,
        &EngineSettings::default(),
    )
    .unwrap();

    let json = serde_json::to_value(&month).expect("serialize");
    assert_eq!(json["final"]["Fun"], "10");
    assert_eq!(json["is_crit"]["Fun"], false);
}

#[test]
fn capacities_near_a_quadrillion_scale_without_overflow() {
    let registry = CategoryRegistry::shared(["Over", "X", "Y"]).unwrap();
    let start = state(
        &registry,
        &[
            ("Over", Bucket::new(dec!(0), dec!(0))),
            ("X", Bucket::new(dec!(0), dec!(1000000000000000))),
            ("Y", Bucket::new(dec!(0), dec!(1000000000000000))),
        ],
    );

    let month = MonthPipeline::run(
        &start,
        &totals(&[("Over", dec!(999999999999999))]),
        Decimal::ZERO,
        &EngineSettings::default(),
    )
    .expect("large amounts apportion");

    assert_eq!(
        month.scaled.values(),
        &[dec!(0), dec!(499999999999999.50), dec!(499999999999999.50)]
    );
    assert_eq!(month.leftover_slush, dec!(0));
}

#[test]
fn finest_minor_unit_still_apportions() {
    let registry = CategoryRegistry::shared(["X", "Y", "Z"]).unwrap();
    let start = state(
        &registry,
        &[
            ("X", Bucket::new(dec!(40), dec!(50))),
            ("Y", Bucket::new(dec!(150), dec!(200))),
            ("Z", Bucket::new(dec!(0), dec!(0))),
        ],
    );
    let settings = EngineSettings::default().with_minor_units(28);
    assert_eq!(settings.minor_unit, dec!(0.00000001));

    let month = MonthPipeline::run(&start, &totals(&[("Z", dec!(30))]), Decimal::ZERO, &settings)
        .expect("capped unit apportions");
    assert_eq!(month.scaled.values(), &[dec!(5), dec!(25), dec!(0)]);
}
