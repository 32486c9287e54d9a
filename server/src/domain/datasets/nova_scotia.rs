//! Nova Scotia Well Logs Database
//!
//! Category columns hold numeric lookup codes rather than labels. Locations
//! are UTM easting/northing, all within zone 20T.

use super::codes;
use crate::domain::wells::{
    CategoricalListOption, Constraint, FilterName, FilterOption, NumericRangeOption, PageBands,
    Projection, Retriever, TimeRangeOption, UtmZone,
};

pub const SLUG: &str = "nova-scotia";

const LAYOUT: &str = "%Y-%m-%d %H:%M:00.000";

pub fn retriever() -> Retriever {
    Retriever::new(SLUG, "tblWellLogs")
        .columns(["Easting", "Northing"])
        .bands(PageBands::standard())
        .projection(Projection::utm(
            "Easting",
            "Northing",
            UtmZone::Fixed {
                number: 20,
                letter: 'T',
            },
        ))
        .filter(
            FilterName::Completed,
            FilterOption::Time(TimeRangeOption::new("DateWellCompleted", LAYOUT)),
        )
        .filter(
            FilterName::Abandoned,
            FilterOption::Time(
                TimeRangeOption::new("DateWellCompleted", LAYOUT).constraint(
                    Constraint::one_of("FinalStatusOfWellL", [5i64, 6, 7, 9, 16, 27]),
                ),
            ),
        )
        .filter(
            FilterName::Status,
            FilterOption::Categorical(CategoricalListOption::new(
                "FinalStatusOfWellL",
                vec![
                    codes("supply", &[1]),
                    codes("research", &[2, 3, 18]),
                    codes("geothermal", &[4, 38, 39, 40]),
                    codes("abandoned", &[5, 6, 7, 8, 9, 16, 27, 36]),
                    codes("other", &[10, 19, 23, 28, 31, 35]),
                    codes("unknown", &[13]),
                ],
            )),
        )
        .filter(
            FilterName::Use,
            FilterOption::Categorical(CategoricalListOption::new(
                "WaterUseL",
                vec![
                    codes("domestic", &[1, 29]),
                    codes("commercial", &[3]),
                    codes("industrial", &[2]),
                    codes("municipal", &[4]),
                    codes("irrigation", &[6]),
                    codes("agriculture", &[8, 26]),
                    codes("research", &[17, 22]),
                    codes("other", &[5, 7, 9, 10, 12, 13, 14, 19]),
                    codes("unknown", &[0, 18, 28]),
                ],
            )),
        )
        .filter(
            FilterName::Colour,
            FilterOption::Categorical(CategoricalListOption::new(
                "wqColourL",
                vec![
                    codes("clear", &[1, 2, 14]),
                    codes("cloudy", &[4, 5, 15]),
                    codes("light", &[3, 6, 8]),
                    codes("dark", &[7, 12, 13, 16]),
                    codes("other", &[10]),
                    codes("unknown", &[9, 11]),
                ],
            )),
        )
        .filter(
            FilterName::Taste,
            FilterOption::Categorical(CategoricalListOption::new(
                "wqTasteL",
                vec![
                    codes("fresh", &[5, 7, 11, 12]),
                    codes("mineral", &[2, 4, 6]),
                    codes("sulfur", &[1]),
                    codes("salt", &[3]),
                    codes("other", &[9]),
                    codes("unknown", &[8, 10]),
                ],
            )),
        )
        .filter(
            FilterName::Odour,
            FilterOption::Categorical(CategoricalListOption::new(
                "wqOdourL",
                vec![
                    codes("fresh", &[3]),
                    codes("mineral", &[4, 12, 13]),
                    codes("sulfur", &[1, 2]),
                    codes("organic", &[5, 6, 7, 11]),
                    codes("other", &[9]),
                    codes("unknown", &[8, 10]),
                ],
            )),
        )
        .filter(
            FilterName::Rate,
            FilterOption::Numeric(NumericRangeOption::new("wyRate")),
        )
        .filter(
            FilterName::Depth,
            FilterOption::Numeric(NumericRangeOption::new("TotalOrFinishedDepth")),
        )
        .filter(
            FilterName::Bedrock,
            FilterOption::Numeric(NumericRangeOption::new("DepthToBedrock")),
        )
}
