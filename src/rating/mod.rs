pub mod access;
pub mod district;
pub mod population;
pub mod visibility;

use crate::error::Result;
use crate::types::config::ScoringConfig;
use crate::types::measurement::LocationContext;
use crate::types::scoring::Ratings;
use tracing::debug;

pub fn rate(context: &LocationContext, config: &ScoringConfig) -> Result<Ratings> {
    let profile = config.profile_for_department(context.department);
    let coefficients = config.coefficients(&profile);
    debug!(
        department = context.department,
        profile = %profile.name,
        ?coefficients,
        "rating location"
    );

    let ratings = Ratings {
        visibility: visibility::rate(&context.visibility, &profile, coefficients)?,
        access: access::rate(&context.access),
        population: population::rate(&context.population),
        district: district::rate(&context.district),
    };

    for table in ratings.tables() {
        debug!(dimension = %table.dimension(), total = table.total(), "rated");
    }
    Ok(ratings)
}
