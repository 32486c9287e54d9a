//! Ontario Water Well Information System
//!
//! Coordinates are stored as UTM with a per-row zone number and band letter,
//! joined in from the `gryVBUTM` view on every query.

use super::{AMPM_LAYOUT, text};
use crate::domain::wells::{
    CategoricalListOption, FilterName, FilterOption, JoinSpec, NumericRangeOption, PageBands,
    Projection, Retriever, TimeRangeOption, UtmZone,
};

pub const SLUG: &str = "ontario";

const TABLE: &str = "qryWaterWellRecord";
const SELECT: &str = "northing, easting, ZONE, code";

fn grouped(right: &str) -> JoinSpec {
    JoinSpec::inner((TABLE, "WELL_ID"), (right, "Well_ID"))
        .group_by("qryWaterWellRecord.Well_ID")
        .order_by("northing")
        .select(SELECT)
}

pub fn retriever() -> Retriever {
    Retriever::new(SLUG, TABLE)
        .columns(["northing", "easting", "ZONE", "code"])
        .join(
            JoinSpec::inner((TABLE, "WELL_ID"), ("gryVBUTM", "Well_ID"))
                .order_by("northing")
                .select(SELECT),
        )
        .bands(PageBands::standard())
        .projection(Projection::utm(
            "easting",
            "northing",
            UtmZone::Columns {
                number_column: "ZONE".to_string(),
                letter_column: "code".to_string(),
            },
        ))
        .filter(
            FilterName::Completed,
            FilterOption::Time(TimeRangeOption::new("Received", AMPM_LAYOUT)),
        )
        .filter(
            FilterName::Abandoned,
            FilterOption::Time(
                TimeRangeOption::new("Received", AMPM_LAYOUT).join(grouped("qryAbandoned")),
            ),
        )
        .filter(
            FilterName::Status,
            FilterOption::Categorical(CategoricalListOption::new(
                "Final_Status",
                vec![
                    text("supply", &["NULL", "Water Supply"]),
                    text(
                        "research",
                        &["Test Hole", "Monitoring and Test Hole", "Observation Wells"],
                    ),
                    text("geothermal", &[]),
                    text(
                        "abandoned",
                        &[
                            "Abandoned Monitoring and Test Hole",
                            "Abandoned-Other",
                            "Abandoned-Quality",
                            "Abandoned-Supply",
                        ],
                    ),
                    text(
                        "other",
                        &[
                            "Alteration",
                            "Dewatering",
                            "Not A Well",
                            "Other Status",
                            "Recharge Well",
                            "Replacement Well",
                        ],
                    ),
                    text("unknown", &["Unfinished"]),
                ],
            )),
        )
        .filter(
            FilterName::Use,
            FilterOption::Categorical(CategoricalListOption::new(
                "Use1",
                vec![
                    text("domestic", &["NULL", "Domestic"]),
                    // "Commerical" is how the source data spells it
                    text("commercial", &["Commerical", "Cooling And A/C", "Dewatering"]),
                    text("industrial", &["Industrial"]),
                    text("municipal", &["Municipal", "Public"]),
                    text("irrigation", &["Irrigation"]),
                    text("agriculture", &["Livestock"]),
                    text(
                        "research",
                        &["Monitoring", "Monitoring and Test Hole", "Test Hole"],
                    ),
                    text("other", &["Other", "Not Used"]),
                    text("unknown", &[]),
                ],
            )),
        )
        .filter(
            FilterName::Rate,
            FilterOption::Numeric(
                NumericRangeOption::new("tblPump_Test.Recom_rate").join(grouped("tblPump_Test")),
            ),
        )
        .filter(
            FilterName::Depth,
            FilterOption::Numeric(
                NumericRangeOption::new("qryWellDepth.Well_Depth_m").join(grouped("qryWellDepth")),
            ),
        )
}
