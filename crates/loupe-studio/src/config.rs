use loupe_engine::coords::ColorRgba;
use loupe_engine::logging::LoggingConfig;
use loupe_engine::window::RuntimeConfig;
use loupe_lens::LensConfig;
use winit::dpi::LogicalSize;

/// Increments applied by one key press.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ControlSteps {
    pub zoom: f32,
    /// Multiplicative.
    pub shape_exponent: f32,
    pub radius: f32,
    pub outline_thickness: f32,
}

impl Default for ControlSteps {
    fn default() -> Self {
        Self {
            zoom: 0.25,
            shape_exponent: 1.25,
            radius: 10.0,
            outline_thickness: 1.0,
        }
    }
}

/// Everything the demo reads at startup.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub runtime: RuntimeConfig,
    pub logging: LoggingConfig,
    /// Lens state at startup and after a reset.
    pub lens: LensConfig,
    /// Cubes per side of the square field.
    pub grid: u32,
    /// Solid background used while the background toggle is on.
    pub background: ColorRgba,
    /// Start with the solid background instead of the gradient.
    pub solid_background: bool,
    /// Screen clear color for unmagnified frames.
    pub clear_color: ColorRgba,
    pub steps: ControlSteps,
    /// Outline colors cycled by the `O` key, packed `0xRRGGBB`.
    pub outline_palette: Vec<u32>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig {
                title: "Loupe Studio".to_string(),
                initial_size: LogicalSize::new(1280.0, 800.0),
            },
            logging: LoggingConfig::default(),
            lens: LensConfig::default(),
            grid: 7,
            background: ColorRgba::from_rgb_hex(0x1E2430),
            solid_background: true,
            clear_color: ColorRgba::black(),
            steps: ControlSteps::default(),
            outline_palette: vec![LensConfig::DEFAULT_OUTLINE_COLOR, 0xE8B04A, 0x4AA3E8, 0x202020],
        }
    }
}
