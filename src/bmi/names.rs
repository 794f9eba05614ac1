//! Standard variable and setup-parameter names shared by the coupled models.

/// Incoming wave direction produced by the wave model and consumed by CEM.
pub const WAVE_ANGLE: &str = "sea_surface_water_wave__azimuth_angle_of_opposite_of_phase_velocity";

/// Water depth field reported by CEM.
pub const WATER_DEPTH: &str = "sea_water__depth";

/// Land-surface elevation field CEM is seeded with.
pub const LAND_ELEVATION: &str = "land_surface__elevation";

/// Deep-water wave height.
pub const WAVE_HEIGHT: &str = "sea_surface_water_wave__height";

/// Wave period.
pub const WAVE_PERIOD: &str = "sea_surface_water_wave__period";

/// Ashton et al. fraction of high-angle waves (U).
pub const WAVE_ANGLE_HIGHNESS: &str =
    "sea_shoreline_wave~incoming~deepwater__ashton_et_al_approach_angle_highness_parameter";

/// Ashton et al. fraction of waves approaching from the left (A).
pub const WAVE_ANGLE_ASYMMETRY: &str =
    "sea_shoreline_wave~incoming~deepwater__ashton_et_al_approach_angle_asymmetry_parameter";

// CEM setup keys

pub const NUMBER_OF_ROWS: &str = "number_of_rows";
pub const NUMBER_OF_COLS: &str = "number_of_cols";
pub const GRID_SPACING: &str = "grid_spacing";
pub const SHELF_SLOPE: &str = "shelf_slope";
pub const SHOREFACE_DEPTH: &str = "shoreface_depth";
pub const SHOREFACE_SLOPE: &str = "shoreface_slope";
