//! Saskatchewan Water Security Agency well records

use super::text;
use crate::data::SqlValue;
use crate::domain::wells::{
    CategoricalListOption, Category, FilterName, FilterOption, NumericRangeOption, PageBands,
    Projection, Retriever, TimeRangeOption,
};

pub const SLUG: &str = "saskatchewan";

const LAYOUT: &str = "%Y.%m.%d";

pub fn retriever() -> Retriever {
    Retriever::new(SLUG, "tblWells")
        .columns(["latitude", "longitude"])
        .bands(PageBands::standard())
        .projection(Projection::lat_lng("latitude", "longitude"))
        .filter(
            FilterName::Completed,
            FilterOption::Time(TimeRangeOption::new("completed", LAYOUT)),
        )
        .filter(
            FilterName::Abandoned,
            FilterOption::Time(TimeRangeOption::new("date_decommisioned", LAYOUT)),
        )
        .filter(
            FilterName::Status,
            FilterOption::Categorical(CategoricalListOption::new(
                "well_use",
                vec![
                    Category::new("supply", [SqlValue::Null, SqlValue::from("Withdrawal")]),
                    text(
                        "research",
                        &[
                            "Observation",
                            "Quality Monitoring",
                            "Seismic Test Hole",
                            "Soil Test Hole",
                            "Water Test Hole",
                        ],
                    ),
                    text("geothermal", &[]),
                    text("abandoned", &[]),
                    text("other", &["Waste Disposal", "Recharge"]),
                    text("unknown", &[]),
                ],
            )),
        )
        .filter(
            FilterName::Use,
            FilterOption::Categorical(CategoricalListOption::new(
                "water_use",
                vec![
                    Category::new("domestic", [SqlValue::Null, SqlValue::from("Domestic")]),
                    text("commercial", &["Multi-purpose"]),
                    text(
                        "industrial",
                        &["Industrial", "Mineral Recovery", "Mineral Water"],
                    ),
                    text("municipal", &["Municipal", "Recreation"]),
                    text("irrigation", &["Irrigation", "Drainage"]),
                    text("agriculture", &[]),
                    text("research", &["Research"]),
                    text("other", &["Other"]),
                    text("unknown", &[]),
                ],
            )),
        )
        .filter(
            FilterName::Rate,
            FilterOption::Numeric(NumericRangeOption::new("recommended_pumping_rate")),
        )
        .filter(
            FilterName::Depth,
            FilterOption::Numeric(NumericRangeOption::new("TotalOrFinishedDepth")),
        )
}
