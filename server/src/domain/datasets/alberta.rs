//! Alberta Water Well Information Database

use super::{AMPM_LAYOUT, text};
use crate::domain::wells::{
    CategoricalListOption, FilterName, FilterOption, JoinSpec, NumericRangeOption, PageBands,
    Projection, Retriever, TimeRangeOption,
};

pub const SLUG: &str = "alberta";

fn reports() -> JoinSpec {
    JoinSpec::inner(("Wells", "Well_ID"), ("Well_Reports", "Well_ID"))
        .group_by("Wells.Well_ID")
        .order_by("MAX(Latitude)")
        .select("MAX(Latitude) as Latitude, MAX(Longitude) as Longitude")
}

fn lithologies() -> JoinSpec {
    JoinSpec::inner(("Wells", "GIC_Well_ID"), ("Lithologies", "GIC_Well_ID"))
        .group_by("Wells.GIC_Well_ID")
        .order_by("MAX(Latitude)")
        .select("MAX(Latitude) as Latitude, MAX(Longitude) as Longitude")
}

pub fn retriever() -> Retriever {
    Retriever::new(SLUG, "Wells")
        .columns(["Latitude", "Longitude"])
        .bands(PageBands::standard())
        .projection(Projection::lat_lng("Latitude", "Longitude"))
        .filter(
            FilterName::Completed,
            FilterOption::Time(
                TimeRangeOption::new("Well_Reports.Drilling_End_Date", AMPM_LAYOUT).join(reports()),
            ),
        )
        .filter(
            FilterName::Abandoned,
            FilterOption::Time(
                TimeRangeOption::new("Well_Reports.Plug_Date", AMPM_LAYOUT).join(reports()),
            ),
        )
        .filter(
            FilterName::Status,
            FilterOption::Categorical(
                CategoricalListOption::new(
                    "Well_Reports.Type_of_Work",
                    vec![
                        text("supply", &["New Well", "Deepened", "Reconditioned", "Spring"]),
                        text(
                            "research",
                            &[
                                "Test Hole",
                                "Coal Test Hole",
                                "Core Hole",
                                "Federal Well Survey",
                                "Chemistry",
                                "Structure Test Hole",
                                "Well Inventory",
                                "Drill Stem Test Hole",
                                "Piezometer",
                                "Seismic Shot Hole",
                            ],
                        ),
                        text("geothermal", &[]),
                        text(
                            "abandoned",
                            &[
                                "Dry Hole",
                                "Old Well-Yield",
                                "Dry Hole-Decommissioned",
                                "New Well-Decommissioned",
                                "Test Hole-Decommissioned",
                                "Existing Well-Decommissioned",
                            ],
                        ),
                        text(
                            "other",
                            &["Other", "Flowing Shot Hole", "Oil Exploratory", "Cathodic Protection"],
                        ),
                        text("unknown", &["Unknown"]),
                    ],
                )
                .join(reports()),
            ),
        )
        .filter(
            FilterName::Use,
            FilterOption::Categorical(
                CategoricalListOption::new(
                    "Well_Reports.Well_Use",
                    vec![
                        text(
                            "domestic",
                            &["NULL", "Domestic", "New Well", "Standby", "Water Hauling"],
                        ),
                        text(
                            "commercial",
                            &["Industrial", "Dewatering", "Geothermal", "Heat Transfer"],
                        ),
                        text(
                            "industrial",
                            &[
                                "Industrial",
                                "Domestic & Industrial",
                                "Industrial Camp",
                                "Injection",
                            ],
                        ),
                        text(
                            "municipal",
                            &[
                                "Municipal",
                                "Co-ops (Colonies)",
                                "Municipal & Industrial",
                                "Rural Subdivision",
                            ],
                        ),
                        text(
                            "irrigation",
                            &["Irrigation", "Domestic & Irrigation", "Golf Courses"],
                        ),
                        text(
                            "agriculture",
                            &[
                                "Stock",
                                "Domestic & Stock",
                                "Industrial & Stock",
                                "Intensive Livestock Operation",
                            ],
                        ),
                        text(
                            "research",
                            &[
                                "Observation",
                                "Contamination Invest.",
                                "Hydrostatic Testing",
                                "Investigation",
                                "Monitoring",
                            ],
                        ),
                        text(
                            "other",
                            &[
                                "Other",
                                "Dry Hole - Abandoned",
                                "Old Well - Abandoned",
                                "Test Hole - Abandoned",
                                "Test Hole-Abandoned",
                            ],
                        ),
                        text("unknown", &["Unknown"]),
                    ],
                )
                .join(reports()),
            ),
        )
        .filter(
            FilterName::Colour,
            FilterOption::Categorical(
                CategoricalListOption::new(
                    "Lithologies.Colour",
                    vec![
                        text("clear", &["NULL", "Gray", "White"]),
                        text(
                            "cloudy",
                            &[
                                "Yellow",
                                "Brown",
                                "Green",
                                "Blue",
                                "Tan",
                                "Red",
                                "Gray Salt & Pepper",
                                "Salt & Pepper",
                            ],
                        ),
                        text(
                            "light",
                            &[
                                "Light",
                                "Light Gray",
                                "Light Red",
                                "Greenish Gray",
                                "Light Yellow",
                                "Light Green",
                                "Light Blue",
                                "Light Brown",
                                "Blue Gray",
                                "Greenish Yellow",
                            ],
                        ),
                        text(
                            "dark",
                            &[
                                "Dark",
                                "Black",
                                "Dark Gray",
                                "Dark Brown",
                                "Dark Red",
                                "Dark Blue",
                                "Dark Green",
                                "Dark Yellow",
                                "Bluish Green",
                                "Brownish Gray",
                                "Brownish Green",
                                "Brownish Yellow",
                            ],
                        ),
                        text("other", &["See Comments"]),
                        text("unknown", &["Unreadable", "Unknown"]),
                    ],
                )
                .join(lithologies()),
            ),
        )
        .filter(
            FilterName::Rate,
            FilterOption::Numeric(
                NumericRangeOption::new("Well_Reports.Recommended_Rate").join(reports()),
            ),
        )
        .filter(
            FilterName::Depth,
            FilterOption::Numeric(
                NumericRangeOption::new("Well_Reports.Total_Depth_Drilled").join(reports()),
            ),
        )
}
