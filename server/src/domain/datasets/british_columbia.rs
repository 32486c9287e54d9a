//! British Columbia GWELLS

use super::{AMPM_LAYOUT, text};
use crate::domain::wells::{
    CategoricalListOption, Constraint, FilterName, FilterOption, JoinSpec, NumericRangeOption,
    PageBands, Projection, Retriever, TimeRangeOption,
};

pub const SLUG: &str = "british-columbia";

pub fn retriever() -> Retriever {
    let lithology = JoinSpec::inner(("well", "well_tag_number"), ("lithology", "well_tag_number"))
        .group_by("well.well_tag_number")
        .order_by("MAX(latitude_Decdeg)")
        .select("MAX(latitude_Decdeg) as latitude_Decdeg, MAX(longitude_Decdeg) as longitude_Decdeg");

    Retriever::new(SLUG, "well")
        .columns(["latitude_Decdeg", "longitude_Decdeg"])
        .bands(PageBands::standard())
        .projection(Projection::lat_lng("latitude_Decdeg", "longitude_Decdeg"))
        .filter(
            FilterName::Completed,
            FilterOption::Time(TimeRangeOption::new("construction_end_date", AMPM_LAYOUT)),
        )
        .filter(
            FilterName::Abandoned,
            FilterOption::Time(
                TimeRangeOption::new("construction_end_date", AMPM_LAYOUT)
                    .constraint(Constraint::equals("well_status_code", "ABANDONED")),
            ),
        )
        .filter(
            FilterName::Status,
            FilterOption::Categorical(CategoricalListOption::new(
                "well_status_code",
                vec![
                    text("supply", &["NEW"]),
                    text("research", &[]),
                    text("geothermal", &[]),
                    text("abandoned", &["ABANDONED", "CLOSURE"]),
                    text("other", &["ALTERATION", "OTHER"]),
                    text("unknown", &[""]),
                ],
            )),
        )
        .filter(
            FilterName::Use,
            FilterOption::Categorical(CategoricalListOption::new(
                "intended_water_use_code",
                vec![
                    text("domestic", &["DOM"]),
                    text("commercial", &["COM", "DWS"]),
                    text("industrial", &[]),
                    text("municipal", &[]),
                    text("irrigation", &["IRR"]),
                    text("agriculture", &[]),
                    text("research", &["TST", "OBS", "OP_LP_GEO"]),
                    text("other", &["OTHER", "NA"]),
                    text("unknown", &["UNK"]),
                ],
            )),
        )
        .filter(
            FilterName::Colour,
            FilterOption::Categorical(
                CategoricalListOption::new(
                    "lithology.lithology_colour_code",
                    vec![
                        text("clear", &["NULL", "grey", "white"]),
                        text("cloudy", &["salt & pepper", "speckled", "tan"]),
                        text("light", &["light", "vari-coloured", "yellow"]),
                        text(
                            "dark",
                            &[
                                "black",
                                "blue",
                                "brown",
                                "dark",
                                "green",
                                "purple",
                                "red",
                                "rust-coloured",
                            ],
                        ),
                        text("other", &[]),
                        text("unknown", &["0 nothing entered"]),
                    ],
                )
                .join(lithology),
            ),
        )
        .filter(
            FilterName::Rate,
            FilterOption::Numeric(NumericRangeOption::new("well_yield_usgpm")),
        )
        .filter(
            FilterName::Depth,
            FilterOption::Numeric(NumericRangeOption::new("\"finished_well_depth_ft-bgl\"")),
        )
        .filter(
            FilterName::Bedrock,
            FilterOption::Numeric(NumericRangeOption::new("\"bedrock_depth_ft-bgl\"")),
        )
}
