use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub starfield: StarfieldConfig,
    #[serde(default)]
    pub asteroids: AsteroidConfig,
    #[serde(default)]
    pub galaxy: GalaxyConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub indicator: IndicatorConfig,
    #[serde(default)]
    pub preloader: PreloaderConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log file lives here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Smoothing constants for scroll progress and pointer steering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Per-frame lerp factor for scroll progress
    #[serde(default = "default_scroll_smoothing")]
    pub scroll_smoothing: f64,
    /// Per-frame lerp factor for the pointer position used by parallax
    #[serde(default = "default_pointer_smoothing")]
    pub pointer_smoothing: f64,
    /// How strongly a pointer delta feeds the steering inertia
    #[serde(default = "default_steer_strength")]
    pub steer_strength: f64,
    /// Fraction of the inertia applied to the rotation each frame
    #[serde(default = "default_steer_damp")]
    pub steer_damp: f64,
    /// Relaxation of the rotation toward neutral each frame
    #[serde(default = "default_steer_return")]
    pub steer_return: f64,
    /// Geometric decay of the inertia each frame
    #[serde(default = "default_steer_decay")]
    pub steer_decay: f64,
    /// World tilt around X per unit of smoothed pointer Y
    #[serde(default = "default_tilt_x")]
    pub tilt_x: f64,
    /// World turn around Y per unit of smoothed pointer X
    #[serde(default = "default_tilt_y")]
    pub tilt_y: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            scroll_smoothing: default_scroll_smoothing(),
            pointer_smoothing: default_pointer_smoothing(),
            steer_strength: default_steer_strength(),
            steer_damp: default_steer_damp(),
            steer_return: default_steer_return(),
            steer_decay: default_steer_decay(),
            tilt_x: default_tilt_x(),
            tilt_y: default_tilt_y(),
        }
    }
}

/// Easing curve for time-based animations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    Cubic,
    Quintic,
    EaseOut,
}

/// Smooth page scrolling (wheel, keys and marker jumps)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollConfig {
    #[serde(default = "default_true")]
    pub smooth_enabled: bool,
    #[serde(default = "default_scroll_duration")]
    pub animation_duration_ms: u64,
    #[serde(default = "default_scroll_easing")]
    pub easing: EasingType,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            smooth_enabled: default_true(),
            animation_duration_ms: default_scroll_duration(),
            easing: default_scroll_easing(),
        }
    }
}

/// Virtual page geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Total document height in virtual pixels
    #[serde(default = "default_scroll_length")]
    pub scroll_length: f64,
    /// Virtual pixels per terminal row
    #[serde(default = "default_pixels_per_row")]
    pub pixels_per_row: f64,
    /// Pixels scrolled per wheel notch or key press
    #[serde(default = "default_wheel_step")]
    pub wheel_step: f64,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            scroll_length: default_scroll_length(),
            pixels_per_row: default_pixels_per_row(),
            wheel_step: default_wheel_step(),
            scroll: ScrollConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_start_z")]
    pub start_z: f64,
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_deg: f64,
    #[serde(default = "default_far")]
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_z: default_camera_start_z(),
            fov_deg: default_fov(),
            far: default_far(),
        }
    }
}

/// Auxiliary visual attached to a section (crew portrait, image placeholder)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemConfig {
    pub label: String,
    /// Stagger delay in [0, 1)
    #[serde(default)]
    pub delay: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    /// Scales the camera travel spent inside this section
    #[serde(default = "default_depth_multiplier")]
    pub depth_multiplier: f64,
    #[serde(default)]
    pub items: Vec<ItemConfig>,
}

impl SectionConfig {
    fn new(title: &str, subtitle: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            depth_multiplier: default_depth_multiplier(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Wall-clock fade-out before the text swap
    #[serde(default = "default_fade_out_ms")]
    pub fade_out_ms: u64,
    /// Delay between consecutive characters of the reveal
    #[serde(default = "default_reveal_stagger_ms")]
    pub reveal_stagger_ms: u64,
    /// Duration of a single character's reveal
    #[serde(default = "default_reveal_char_ms")]
    pub reveal_char_ms: u64,
    #[serde(default = "default_reveal_easing")]
    pub reveal_easing: EasingType,
    /// Fraction into each section where its marker sits, in [0, 1)
    #[serde(default)]
    pub marker_offset: f64,
    /// Camera travel per section before the depth multiplier
    #[serde(default = "default_section_depth")]
    pub section_depth: f64,
    /// Scene fade-in once the intro is revealed
    #[serde(default = "default_scene_fade_ms")]
    pub scene_fade_ms: u64,
    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            fade_out_ms: default_fade_out_ms(),
            reveal_stagger_ms: default_reveal_stagger_ms(),
            reveal_char_ms: default_reveal_char_ms(),
            reveal_easing: default_reveal_easing(),
            marker_offset: 0.0,
            section_depth: default_section_depth(),
            scene_fade_ms: default_scene_fade_ms(),
            sections: default_sections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarfieldConfig {
    #[serde(default = "default_star_count")]
    pub count: usize,
    /// Lateral spread (x and y) around the viewpoint
    #[serde(default = "default_star_spread")]
    pub spread: f64,
    /// Closest spawn distance in front of the camera
    #[serde(default = "default_star_near")]
    pub near: f64,
    /// Depth band stars are spawned in beyond `near`
    #[serde(default = "default_star_depth")]
    pub depth: f64,
    #[serde(default = "default_star_size_min")]
    pub size_min: f64,
    #[serde(default = "default_star_size_max")]
    pub size_max: f64,
    /// Base lifecycle period of a star
    #[serde(default = "default_twinkle_ms")]
    pub twinkle_ms: u64,
    /// Random spread applied to the period (base ± variance)
    #[serde(default = "default_twinkle_variance_ms")]
    pub twinkle_variance_ms: u64,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: default_star_count(),
            spread: default_star_spread(),
            near: default_star_near(),
            depth: default_star_depth(),
            size_min: default_star_size_min(),
            size_max: default_star_size_max(),
            twinkle_ms: default_twinkle_ms(),
            twinkle_variance_ms: default_twinkle_variance_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsteroidConfig {
    #[serde(default = "default_asteroid_count")]
    pub count: usize,
    #[serde(default = "default_asteroid_size_min")]
    pub size_min: f64,
    #[serde(default = "default_asteroid_size_max")]
    pub size_max: f64,
    #[serde(default = "default_asteroid_spread_x")]
    pub spread_x: f64,
    #[serde(default = "default_asteroid_spread_y")]
    pub spread_y: f64,
    /// Nearest asteroid z is `-z_near`
    #[serde(default = "default_asteroid_z_near")]
    pub z_near: f64,
    /// Asteroids are spread over this depth beyond `z_near`
    #[serde(default = "default_asteroid_z_depth")]
    pub z_depth: f64,
    #[serde(default = "default_repel_strength")]
    pub repel_strength: f64,
    #[serde(default = "default_repel_radius")]
    pub repel_radius: f64,
    #[serde(default = "default_linear_damping")]
    pub linear_damping: f64,
    #[serde(default = "default_angular_damping")]
    pub angular_damping: f64,
    /// Fully opaque up to this distance
    #[serde(default = "default_fade_start")]
    pub fade_start: f64,
    /// Invisible beyond this distance
    #[serde(default = "default_fade_end")]
    pub fade_end: f64,
    /// Starts fading out when closer than this
    #[serde(default = "default_near_fade_start")]
    pub near_fade_start: f64,
    /// Invisible when closer than this
    #[serde(default = "default_near_fade_end")]
    pub near_fade_end: f64,
    /// Fixed physics step in seconds
    #[serde(default = "default_physics_dt")]
    pub physics_dt: f64,
}

impl Default for AsteroidConfig {
    fn default() -> Self {
        Self {
            count: default_asteroid_count(),
            size_min: default_asteroid_size_min(),
            size_max: default_asteroid_size_max(),
            spread_x: default_asteroid_spread_x(),
            spread_y: default_asteroid_spread_y(),
            z_near: default_asteroid_z_near(),
            z_depth: default_asteroid_z_depth(),
            repel_strength: default_repel_strength(),
            repel_radius: default_repel_radius(),
            linear_damping: default_linear_damping(),
            angular_damping: default_angular_damping(),
            fade_start: default_fade_start(),
            fade_end: default_fade_end(),
            near_fade_start: default_near_fade_start(),
            near_fade_end: default_near_fade_end(),
            physics_dt: default_physics_dt(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalaxyConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_galaxy_z")]
    pub z: f64,
    /// Edge length of the galaxy plane in world units
    #[serde(default = "default_galaxy_size")]
    pub size: f64,
    #[serde(default = "default_galaxy_opacity")]
    pub opacity: f64,
    /// Radians per frame
    #[serde(default = "default_galaxy_rotation")]
    pub rotation_speed: f64,
    /// Image used as galaxy texture; a procedural spiral is used when unset
    #[serde(default)]
    pub texture_path: Option<PathBuf>,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            z: default_galaxy_z(),
            size: default_galaxy_size(),
            opacity: default_galaxy_opacity(),
            rotation_speed: default_galaxy_rotation(),
            texture_path: None,
        }
    }
}

impl GalaxyConfig {
    /// Texture path with `~` expanded
    pub fn texture_path(&self) -> Option<PathBuf> {
        self.texture_path.as_deref().map(expand_tilde)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Horizontal text offset per unit of pointer X
    #[serde(default = "default_parallax_x")]
    pub parallax_x: f64,
    /// Vertical text offset per unit of pointer Y
    #[serde(default = "default_parallax_y")]
    pub parallax_y: f64,
    /// Steering angle in degrees per unit of pointer X
    #[serde(default = "default_steer_deg")]
    pub steer_deg: f64,
    /// Distance an item starts its approach from
    #[serde(default = "default_item_far")]
    pub item_far: f64,
    /// Distance an item settles at
    #[serde(default = "default_item_near")]
    pub item_near: f64,
    #[serde(default = "default_item_fade_start")]
    pub item_fade_start: f64,
    #[serde(default = "default_item_fade_end")]
    pub item_fade_end: f64,
    #[serde(default = "default_item_near_fade_start")]
    pub item_near_fade_start: f64,
    #[serde(default = "default_item_near_fade_end")]
    pub item_near_fade_end: f64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            parallax_x: default_parallax_x(),
            parallax_y: default_parallax_y(),
            steer_deg: default_steer_deg(),
            item_far: default_item_far(),
            item_near: default_item_near(),
            item_fade_start: default_item_fade_start(),
            item_fade_end: default_item_fade_end(),
            item_near_fade_start: default_item_near_fade_start(),
            item_near_fade_end: default_item_near_fade_end(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Quiet period after the last scroll delta before returning to rest
    #[serde(default = "default_quiet_ms")]
    pub quiet_ms: u64,
    /// Scroll deltas within ±threshold are ignored
    #[serde(default = "default_delta_threshold")]
    pub delta_threshold: f64,
    /// Cap on the speed sample used for the trail rate
    #[serde(default = "default_speed_cap")]
    pub speed_cap: f64,
    #[serde(default = "default_smoke_interval_ms")]
    pub smoke_interval_ms: u64,
    #[serde(default = "default_smoke_life_ms")]
    pub smoke_life_ms: u64,
    #[serde(default = "default_smoke_life_variance_ms")]
    pub smoke_life_variance_ms: u64,
    #[serde(default = "default_debris_interval_ms")]
    pub debris_interval_ms: u64,
    #[serde(default = "default_debris_life_ms")]
    pub debris_life_ms: u64,
    #[serde(default = "default_debris_life_variance_ms")]
    pub debris_life_variance_ms: u64,
    /// Minimum particles per smoke burst
    #[serde(default = "default_min_burst")]
    pub min_burst: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            quiet_ms: default_quiet_ms(),
            delta_threshold: default_delta_threshold(),
            speed_cap: default_speed_cap(),
            smoke_interval_ms: default_smoke_interval_ms(),
            smoke_life_ms: default_smoke_life_ms(),
            smoke_life_variance_ms: default_smoke_life_variance_ms(),
            debris_interval_ms: default_debris_interval_ms(),
            debris_life_ms: default_debris_life_ms(),
            debris_life_variance_ms: default_debris_life_variance_ms(),
            min_burst: default_min_burst(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreloaderConfig {
    /// Delay between completing the progress bar and fading out
    #[serde(default = "default_hide_delay_ms")]
    pub hide_delay_ms: u64,
    #[serde(default = "default_preloader_fade_ms")]
    pub fade_ms: u64,
    #[serde(default = "default_logo_text")]
    pub logo_text: String,
}

impl Default for PreloaderConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: default_hide_delay_ms(),
            fade_ms: default_preloader_fade_ms(),
            logo_text: default_logo_text(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Target frame rate
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Show the scroll/Z/mouse debug line
    #[serde(default)]
    pub show_debug: bool,
    /// Seed for star and asteroid placement; random when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            show_debug: false,
            seed: None,
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "k", "<C-f>" (Ctrl+f), "G" (Shift+g), "<Space>", "gg"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    #[serde(default = "default_key_quit")]
    pub quit: String,
    #[serde(default = "default_key_scroll_down")]
    pub scroll_down: String,
    #[serde(default = "default_key_scroll_up")]
    pub scroll_up: String,
    #[serde(default = "default_key_page_down")]
    pub page_down: String,
    #[serde(default = "default_key_page_up")]
    pub page_up: String,
    #[serde(default = "default_key_jump_to_top")]
    pub jump_to_top: String,
    #[serde(default = "default_key_jump_to_bottom")]
    pub jump_to_bottom: String,
    #[serde(default = "default_key_next_section")]
    pub next_section: String,
    #[serde(default = "default_key_prev_section")]
    pub prev_section: String,
    #[serde(default = "default_key_toggle_debug")]
    pub toggle_debug: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            scroll_down: default_key_scroll_down(),
            scroll_up: default_key_scroll_up(),
            page_down: default_key_page_down(),
            page_up: default_key_page_up(),
            jump_to_top: default_key_jump_to_top(),
            jump_to_bottom: default_key_jump_to_bottom(),
            next_section: default_key_next_section(),
            prev_section: default_key_prev_section(),
            toggle_debug: default_key_toggle_debug(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_scroll_down() -> String { "j".to_string() }
fn default_key_scroll_up() -> String { "k".to_string() }
fn default_key_page_down() -> String { "<C-f>".to_string() }
fn default_key_page_up() -> String { "<C-b>".to_string() }
fn default_key_jump_to_top() -> String { "gg".to_string() }
fn default_key_jump_to_bottom() -> String { "G".to_string() }
fn default_key_next_section() -> String { "n".to_string() }
fn default_key_prev_section() -> String { "p".to_string() }
fn default_key_toggle_debug() -> String { "d".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("liftoff")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_scroll_smoothing() -> f64 { 0.08 }
fn default_pointer_smoothing() -> f64 { 0.05 }
fn default_steer_strength() -> f64 { 0.15 }
fn default_steer_damp() -> f64 { 0.1 }
fn default_steer_return() -> f64 { 0.08 }
fn default_steer_decay() -> f64 { 0.85 }
fn default_tilt_x() -> f64 { 0.08 }
fn default_tilt_y() -> f64 { 0.1 }

fn default_scroll_duration() -> u64 {
    1200
}

fn default_scroll_easing() -> EasingType {
    EasingType::EaseOut
}

fn default_scroll_length() -> f64 { 5000.0 }
fn default_pixels_per_row() -> f64 { 20.0 }
fn default_wheel_step() -> f64 { 120.0 }

fn default_camera_start_z() -> f64 { 100.0 }
fn default_fov() -> f64 { 75.0 }
fn default_far() -> f64 { 5000.0 }

fn default_depth_multiplier() -> f64 { 1.0 }
fn default_fade_out_ms() -> u64 { 800 }
fn default_reveal_stagger_ms() -> u64 { 35 }
fn default_reveal_char_ms() -> u64 { 450 }
fn default_reveal_easing() -> EasingType { EasingType::Cubic }
fn default_section_depth() -> f64 { 1000.0 }

fn default_scene_fade_ms() -> u64 {
    3000 // Canvas opacity transition
}

fn default_sections() -> Vec<SectionConfig> {
    let crew = ["COMMANDER", "PILOT", "ENGINEER", "SCIENTIST", "MEDIC"];
    let mut crew_section = SectionConfig::new("THE CREW", "Five astronauts. One chance.");
    crew_section.depth_multiplier = 1.5;
    crew_section.items = crew
        .iter()
        .enumerate()
        .map(|(i, label)| ItemConfig {
            label: label.to_string(),
            delay: i as f64 * 0.15,
        })
        .collect();

    vec![
        SectionConfig::new("LIFTOFF", "A journey beyond the stars"),
        SectionConfig::new("THE MISSION", "Humanity's greatest adventure"),
        crew_section,
        SectionConfig::new("THE STAKES", "Everything we know hangs in the balance"),
        SectionConfig::new("COMING SOON", "2026"),
    ]
}

fn default_star_count() -> usize { 600 }
fn default_star_spread() -> f64 { 3000.0 }
fn default_star_near() -> f64 { 200.0 }
fn default_star_depth() -> f64 { 1800.0 }
fn default_star_size_min() -> f64 { 0.5 }
fn default_star_size_max() -> f64 { 2.5 }
fn default_twinkle_ms() -> u64 { 4000 }
fn default_twinkle_variance_ms() -> u64 { 2000 }

fn default_asteroid_count() -> usize { 40 }
fn default_asteroid_size_min() -> f64 { 8.0 }
fn default_asteroid_size_max() -> f64 { 68.0 }
fn default_asteroid_spread_x() -> f64 { 600.0 }
fn default_asteroid_spread_y() -> f64 { 400.0 }
fn default_asteroid_z_near() -> f64 { 200.0 }
fn default_asteroid_z_depth() -> f64 { 5000.0 }
fn default_repel_strength() -> f64 { 8000.0 }
fn default_repel_radius() -> f64 { 80.0 }
fn default_linear_damping() -> f64 { 0.15 }
fn default_angular_damping() -> f64 { 0.02 }
fn default_fade_start() -> f64 { 1900.0 }
fn default_fade_end() -> f64 { 2000.0 }
fn default_near_fade_start() -> f64 { 60.0 }
fn default_near_fade_end() -> f64 { 10.0 }
fn default_physics_dt() -> f64 { 1.0 / 60.0 }

fn default_galaxy_z() -> f64 { -1800.0 }
fn default_galaxy_size() -> f64 { 2000.0 }
fn default_galaxy_opacity() -> f64 { 0.7 }
fn default_galaxy_rotation() -> f64 { 0.0001 }

fn default_parallax_x() -> f64 { 40.0 }
fn default_parallax_y() -> f64 { 35.0 }
fn default_steer_deg() -> f64 { 8.0 }
fn default_item_far() -> f64 { 900.0 }
fn default_item_near() -> f64 { 150.0 }
fn default_item_fade_start() -> f64 { 600.0 }
fn default_item_fade_end() -> f64 { 900.0 }
fn default_item_near_fade_start() -> f64 { 120.0 }
fn default_item_near_fade_end() -> f64 { 40.0 }

fn default_quiet_ms() -> u64 { 150 }
fn default_delta_threshold() -> f64 { 2.0 }
fn default_speed_cap() -> f64 { 50.0 }
fn default_smoke_interval_ms() -> u64 { 30 }
fn default_smoke_life_ms() -> u64 { 400 }
fn default_smoke_life_variance_ms() -> u64 { 200 }
fn default_debris_interval_ms() -> u64 { 300 }
fn default_debris_life_ms() -> u64 { 1500 }
fn default_debris_life_variance_ms() -> u64 { 1000 }
fn default_min_burst() -> usize { 8 }

fn default_hide_delay_ms() -> u64 { 500 }
fn default_preloader_fade_ms() -> u64 { 500 }
fn default_logo_text() -> String { "TRIGLASS".to_string() }

fn default_fps() -> u32 { 60 }

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        let config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?
        } else {
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/liftoff/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("liftoff")
            .join("config.toml")
    }

    /// Get the log file path
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("liftoff.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Reject values the animation math cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        let unit = |name: &str, v: f64| {
            if v > 0.0 && v < 1.0 {
                Ok(())
            } else {
                Err(crate::Error::Config(format!("{name} must be in (0, 1), got {v}")))
            }
        };
        unit("motion.scroll_smoothing", self.motion.scroll_smoothing)?;
        unit("motion.pointer_smoothing", self.motion.pointer_smoothing)?;
        unit("motion.steer_decay", self.motion.steer_decay)?;

        if self.sequence.sections.is_empty() {
            return Err(crate::Error::Config("sequence.sections must not be empty".into()));
        }
        if !(0.0..1.0).contains(&self.sequence.marker_offset) {
            return Err(crate::Error::Config(format!(
                "sequence.marker_offset must be in [0, 1), got {}",
                self.sequence.marker_offset
            )));
        }
        for section in &self.sequence.sections {
            if section.depth_multiplier <= 0.0 {
                return Err(crate::Error::Config(format!(
                    "section '{}' has non-positive depth_multiplier",
                    section.title
                )));
            }
            if let Some(item) = section.items.iter().find(|i| !(0.0..1.0).contains(&i.delay)) {
                return Err(crate::Error::Config(format!(
                    "item '{}' in section '{}' has delay {} outside [0, 1)",
                    item.label, section.title, item.delay
                )));
            }
        }
        if self.asteroids.fade_end <= self.asteroids.fade_start {
            return Err(crate::Error::Config("asteroids.fade_end must exceed fade_start".into()));
        }
        if self.asteroids.near_fade_start <= self.asteroids.near_fade_end {
            return Err(crate::Error::Config(
                "asteroids.near_fade_start must exceed near_fade_end".into(),
            ));
        }
        if self.page.scroll_length <= 0.0 {
            return Err(crate::Error::Config("page.scroll_length must be positive".into()));
        }
        Ok(())
    }
}
