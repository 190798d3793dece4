use std::path::PathBuf;

use config::{Config, ConfigBuilder, Environment, builder::DefaultState};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::globe::{
    animation::AnimationSettings, dots::DotPolygon, error::GlobeError, sampler::SphereSampler,
};

pub fn rgb_from_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dot_count: u32,
    pub land_radius: f32,
    pub earth_radius: f32,
    pub earth_width_segments: u32,
    pub earth_height_segments: u32,
    pub antialias: bool,
    pub dot_radius: f32,
    pub dot_sides: u32,
    pub color_a: [f32; 3],
    pub color_b: [f32; 3],
    pub rotation_rate: f32,
    pub time_scale: f32,
    pub background_color: u32,
    pub earth_color: u32,
    pub earth_opacity: f32,
    pub ambient_light_color: u32,
    pub ambient_light_intensity: f32,
    pub sun_color: u32,
    pub sun_intensity: f32,
    pub sun_position: [f32; 3],
    pub highlight_color: u32,
    pub highlight_intensity: f32,
    pub highlight_position: [f32; 3],
    // degrees
    pub camera_fov: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub camera_position: [f32; 3],
    pub land_mask_path: PathBuf,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dot_count: 60_000,
            land_radius: 600.0,
            earth_radius: 600.0,
            earth_width_segments: 48,
            earth_height_segments: 48,
            antialias: true,
            dot_radius: 2.0,
            dot_sides: 3,
            color_a: [0.0, 0.255, 0.533],
            color_b: [0.0, 0.482, 1.0],
            rotation_rate: 0.05,
            time_scale: 0.001,
            background_color: 0x001933,
            earth_color: 0x1c1b25,
            earth_opacity: 0.8,
            ambient_light_color: 0x004188,
            ambient_light_intensity: 0.3,
            sun_color: 0x0062cc,
            sun_intensity: 0.4,
            sun_position: [-1200.0, -1200.0, -100.0],
            highlight_color: 0x004188,
            highlight_intensity: 0.2,
            highlight_position: [1200.0, 1200.0, 1200.0],
            camera_fov: 90.0,
            camera_near: 1.0,
            camera_far: 2000.0,
            camera_position: [0.0, 0.0, 999.0],
            land_mask_path: PathBuf::from("resources/land_mask.png"),
            seed: None,
        }
    }
}

impl Settings {
    /// Reads `Settings.toml` from the working directory when present, then `GLOBE_*`
    /// environment variables on top of it.
    pub fn load() -> Result<Self, GlobeError> {
        Self::from_builder(Self::layered(
            config::File::with_name("Settings").required(false),
            Self::environment(),
        ))
    }

    fn environment() -> Environment {
        Environment::with_prefix("GLOBE").try_parsing(true)
    }

    fn layered<F>(file: F, environment: Environment) -> ConfigBuilder<DefaultState>
    where
        F: config::Source + Send + Sync + 'static,
    {
        Config::builder().add_source(file).add_source(environment)
    }

    pub fn from_toml(toml: &str) -> Result<Self, GlobeError> {
        Self::from_builder(
            Config::builder().add_source(config::File::from_str(toml, config::FileFormat::Toml)),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, GlobeError> {
        let settings = builder.build()?.try_deserialize::<Self>()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), GlobeError> {
        for radius in [self.land_radius, self.earth_radius] {
            if radius.is_nan() || radius <= 0.0 {
                return Err(GlobeError::InvalidRadius(radius));
            }
        }
        self.dot_polygon()?;
        Ok(())
    }

    pub fn sampler(&self) -> Result<SphereSampler, GlobeError> {
        SphereSampler::new(self.dot_count, self.land_radius)
    }

    pub fn dot_polygon(&self) -> Result<DotPolygon, GlobeError> {
        DotPolygon::new(self.dot_radius, self.dot_sides)
    }

    pub fn sample_count(&self) -> u32 {
        if self.antialias { 4 } else { 1 }
    }

    pub fn animation(&self) -> AnimationSettings {
        AnimationSettings {
            time_scale: self.time_scale,
            rotation_rate: self.rotation_rate,
        }
    }

    /// Random source for the per-dot phases. Without a configured seed it is seeded from
    /// the thread-local generator, so every globe gets its own stream.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_ulps_eq;
    use rand::Rng;
    use rstest::rstest;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn reads_overrides() {
        let settings = Settings::from_toml(
            r#"
dot_count = 1200
land_radius = 300.0
color_b = [1.0, 0.5, 0.25]
background_color = 0x102030
land_mask_path = "masks/earth.png"
seed = 9
"#,
        )
        .unwrap();

        assert_eq!(settings.dot_count, 1200);
        assert_ulps_eq!(settings.land_radius, 300.0);
        assert_eq!(settings.color_b, [1.0, 0.5, 0.25]);
        assert_eq!(settings.background_color, 0x102030);
        assert_eq!(settings.land_mask_path, PathBuf::from("masks/earth.png"));
        assert_eq!(settings.seed, Some(9));
        assert_eq!(settings.earth_width_segments, 48);
        assert_eq!(settings.earth_height_segments, 48);
    }

    #[rstest]
    #[case("land_radius = 0.0")]
    #[case("earth_radius = -5.0")]
    fn radius_must_be_positive(#[case] toml: &str) {
        assert!(matches!(
            Settings::from_toml(toml),
            Err(GlobeError::InvalidRadius(_))
        ));
    }

    #[test]
    fn earth_segments_are_set_separately() {
        let settings =
            Settings::from_toml("earth_width_segments = 64\nearth_height_segments = 32").unwrap();

        assert_eq!(settings.earth_width_segments, 64);
        assert_eq!(settings.earth_height_segments, 32);
    }

    #[test]
    fn dot_shape_is_validated() {
        assert!(matches!(
            Settings::from_toml("dot_sides = 2"),
            Err(GlobeError::InvalidDotShape { .. })
        ));
    }

    #[test]
    fn malformed_values_are_reported() {
        assert!(matches!(
            Settings::from_toml("dot_count = \"many\""),
            Err(GlobeError::Settings(_))
        ));
    }

    fn layered_with_env(toml: &str, vars: &[(&str, &str)]) -> Result<Settings, GlobeError> {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<config::Map<String, String>>();

        Settings::from_builder(Settings::layered(
            config::File::from_str(toml, config::FileFormat::Toml),
            Settings::environment().source(Some(vars)),
        ))
    }

    #[test]
    fn environment_overrides_file() {
        let settings = layered_with_env(
            "dot_count = 100\nland_radius = 300.0",
            &[("GLOBE_DOT_COUNT", "20000"), ("GLOBE_LAND_RADIUS", "450.5")],
        )
        .unwrap();

        assert_eq!(settings.dot_count, 20000);
        assert_ulps_eq!(settings.land_radius, 450.5);
        assert_eq!(settings.earth_width_segments, 48);
    }

    #[test]
    fn environment_without_prefix_is_ignored() {
        let settings = layered_with_env("dot_count = 100", &[("DOT_COUNT", "5")]).unwrap();

        assert_eq!(settings.dot_count, 100);
    }

    #[test]
    fn environment_values_are_validated() {
        assert!(matches!(
            layered_with_env("", &[("GLOBE_EARTH_RADIUS", "-1.0")]),
            Err(GlobeError::InvalidRadius(_))
        ));
    }

    #[rstest]
    #[case("", 4)]
    #[case("antialias = true", 4)]
    #[case("antialias = false", 1)]
    fn antialias_picks_sample_count(#[case] toml: &str, #[case] expected: u32) {
        assert_eq!(Settings::from_toml(toml).unwrap().sample_count(), expected);
    }

    #[test]
    fn unseeded_rngs_are_independent() {
        let settings = Settings::default();
        let first = settings.rng().random::<[u64; 4]>();
        let second = settings.rng().random::<[u64; 4]>();

        assert_ne!(first, second);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let settings = Settings {
            seed: Some(17),
            ..Default::default()
        };

        assert_eq!(
            settings.rng().random::<u64>(),
            settings.rng().random::<u64>()
        );
    }

    #[rstest]
    #[case(0x000000, [0.0, 0.0, 0.0])]
    #[case(0xffffff, [1.0, 1.0, 1.0])]
    #[case(0xff0000, [1.0, 0.0, 0.0])]
    #[case(0x0000ff, [0.0, 0.0, 1.0])]
    fn converts_hex_colors(#[case] hex: u32, #[case] expected: [f32; 3]) {
        assert_eq!(rgb_from_hex(hex), expected);
    }

    #[test]
    fn animation_settings_follow_config() {
        let animation = Settings::default().animation();

        assert_ulps_eq!(animation.time_scale, 0.001);
        assert_ulps_eq!(animation.rotation_rate, 0.05);
    }
}
