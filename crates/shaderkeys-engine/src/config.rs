use std::path::PathBuf;

use serde_json::Value;

use crate::assets::{read_text, AssetsRoot};
use crate::error::EngineError;
use crate::shaders::SLOT_COUNT;

/// How strictly to interpret `sketch.json`.
///
/// - `Lenient` is forward-compatible: unknown fields are ignored and missing keys fall back
///   to defaults.
/// - `Strict` is fail-fast: unknown fields and unsupported versions become errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigMode {
    Lenient,
    Strict,
}

pub const SUPPORTED_VERSION: u32 = 1;

/// The nine fragment shaders in slot order, relative to `assets/`.
pub const DEFAULT_SHADERS: [&str; SLOT_COUNT] = [
    "shaders/fractal1.frag",
    "shaders/fractal2.frag",
    "shaders/fractal3.frag",
    "shaders/OrganicNoise.frag",
    "shaders/fractalNoise.frag",
    "shaders/fractalNoise2.frag",
    "shaders/psych1.frag",
    "shaders/psych2.frag",
    "shaders/sunExplode.frag",
];

pub const DEFAULT_VERTEX: &str = "shaders/main.vert";

#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct CanvasCfg {
    #[serde(default = "default_canvas_side")]
    pub width: u32,
    #[serde(default = "default_canvas_side")]
    pub height: u32,
}

impl Default for CanvasCfg {
    fn default() -> Self {
        Self {
            width: default_canvas_side(),
            height: default_canvas_side(),
        }
    }
}

fn default_canvas_side() -> u32 {
    100
}

/// Range control settings. Geometry is in logical pixels from the window's top-left corner.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct SliderCfg {
    #[serde(default = "default_slider_min")]
    pub min: f32,
    #[serde(default = "default_slider_max")]
    pub max: f32,
    /// Initial value. The stock value (1.0) sits below `min`; see `Slider::new`.
    #[serde(default = "default_slider_default")]
    pub default: f32,
    #[serde(default = "default_one")]
    pub step: f32,
    #[serde(default = "default_slider_offset")]
    pub x: f32,
    #[serde(default = "default_slider_offset")]
    pub y: f32,
    #[serde(default = "default_slider_width")]
    pub width: f32,
    #[serde(default = "default_slider_height")]
    pub height: f32,
    #[serde(default = "default_true")]
    pub visible: bool,
}

impl Default for SliderCfg {
    fn default() -> Self {
        Self {
            min: default_slider_min(),
            max: default_slider_max(),
            default: default_slider_default(),
            step: default_one(),
            x: default_slider_offset(),
            y: default_slider_offset(),
            width: default_slider_width(),
            height: default_slider_height(),
            visible: true,
        }
    }
}

fn default_slider_min() -> f32 {
    100.0
}
fn default_slider_max() -> f32 {
    4000.0
}
fn default_slider_default() -> f32 {
    1.0
}
fn default_slider_offset() -> f32 {
    10.0
}
fn default_slider_width() -> f32 {
    80.0
}
fn default_slider_height() -> f32 {
    16.0
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize)]
pub struct OnsetCfg {
    #[serde(default = "default_onset")]
    pub initial: f64,
    #[serde(default = "default_onset")]
    pub step: f64,
}

impl Default for OnsetCfg {
    fn default() -> Self {
        Self {
            initial: default_onset(),
            step: default_onset(),
        }
    }
}

fn default_onset() -> f64 {
    0.1
}

/// Typed view of `assets/sketch.json`. Every field is optional.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
pub struct SketchJson {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub canvas: CanvasCfg,
    #[serde(default = "default_true")]
    pub vsync: bool,
    #[serde(default = "default_vertex")]
    pub vertex: String,
    #[serde(default = "default_shaders")]
    pub shaders: Vec<String>,
    #[serde(default)]
    pub slider: SliderCfg,
    #[serde(default)]
    pub onset: OnsetCfg,
    #[serde(default = "default_flux")]
    pub flux: f32,
}

impl Default for SketchJson {
    fn default() -> Self {
        Self {
            version: default_version(),
            title: default_title(),
            canvas: CanvasCfg::default(),
            vsync: true,
            vertex: default_vertex(),
            shaders: default_shaders(),
            slider: SliderCfg::default(),
            onset: OnsetCfg::default(),
            flux: default_flux(),
        }
    }
}

fn default_version() -> u32 {
    1
}
fn default_title() -> String {
    "shaderkeys".into()
}
fn default_true() -> bool {
    true
}
fn default_one() -> f32 {
    1.0
}
fn default_vertex() -> String {
    DEFAULT_VERTEX.into()
}
fn default_shaders() -> Vec<String> {
    DEFAULT_SHADERS.iter().map(|s| s.to_string()).collect()
}
fn default_flux() -> f32 {
    0.5
}

/// Fully resolved configuration: paths are absolute (joined onto the assets root) and all
/// semantic checks have passed.
#[derive(Debug, Clone)]
pub struct SketchConfig {
    /// Where the config was (or would have been) read from.
    pub path: PathBuf,
    /// False when `sketch.json` is absent and built-in defaults are in use.
    pub from_file: bool,
    pub title: String,
    pub canvas: CanvasCfg,
    pub vsync: bool,
    pub vertex_path: PathBuf,
    /// Exactly `SLOT_COUNT` entries, slot order.
    pub shader_paths: Vec<PathBuf>,
    pub slider: SliderCfg,
    pub onset: OnsetCfg,
    pub flux: f32,
}

/// Load `sketch(.<os>).json` from the assets root, or defaults when it does not exist.
pub fn load_sketch_config(assets: &AssetsRoot, mode: ConfigMode) -> Result<SketchConfig, EngineError> {
    let path = assets.pick_platform_json("sketch");
    if !path.exists() {
        return resolve(assets, path, false, SketchJson::default());
    }
    let src = read_text(&path)?;
    parse_sketch_config(assets, path, &src, mode)
}

/// Parse and resolve config text as if it were read from `path`.
pub fn parse_sketch_config(
    assets: &AssetsRoot,
    path: PathBuf,
    src: &str,
    mode: ConfigMode,
) -> Result<SketchConfig, EngineError> {
    let value: Value = serde_json::from_str(src).map_err(|e| EngineError::Json {
        path: path.clone(),
        source: e,
    })?;

    if !value.is_object() {
        return Err(EngineError::invalid(path, "sketch.json must be a JSON object"));
    }

    if mode == ConfigMode::Strict {
        let unknown = unknown_fields(&value);
        if !unknown.is_empty() {
            return Err(EngineError::invalid(
                path,
                format!("unknown field(s): {}", unknown.join(", ")),
            ));
        }
    }

    let sj: SketchJson = serde_json::from_value(value).map_err(|e| EngineError::Json {
        path: path.clone(),
        source: e,
    })?;

    if mode == ConfigMode::Strict && sj.version != SUPPORTED_VERSION {
        return Err(EngineError::invalid(
            path,
            format!(
                "unsupported sketch.json version {} (expected {SUPPORTED_VERSION})",
                sj.version
            ),
        ));
    }

    resolve(assets, path, true, sj)
}

fn resolve(
    assets: &AssetsRoot,
    path: PathBuf,
    from_file: bool,
    sj: SketchJson,
) -> Result<SketchConfig, EngineError> {
    if sj.shaders.len() != SLOT_COUNT {
        return Err(EngineError::invalid(
            path,
            format!(
                "expected {SLOT_COUNT} shaders (one per digit key), found {}",
                sj.shaders.len()
            ),
        ));
    }
    if sj.canvas.width == 0 || sj.canvas.height == 0 {
        return Err(EngineError::invalid(
            path,
            format!("canvas must be non-empty, got {}x{}", sj.canvas.width, sj.canvas.height),
        ));
    }
    let s = &sj.slider;
    if !(s.min.is_finite() && s.max.is_finite()) || s.min >= s.max {
        return Err(EngineError::invalid(
            path,
            format!("slider.min ({}) must be below slider.max ({})", s.min, s.max),
        ));
    }
    if s.step < 0.0 || !s.step.is_finite() {
        return Err(EngineError::invalid(path, format!("slider.step must be >= 0, got {}", s.step)));
    }
    if s.width <= 0.0 {
        return Err(EngineError::invalid(path, format!("slider.width must be > 0, got {}", s.width)));
    }
    let o = &sj.onset;
    if !o.initial.is_finite() {
        return Err(EngineError::invalid(path, format!("onset.initial must be finite, got {}", o.initial)));
    }
    if o.step < 0.0 || !o.step.is_finite() {
        return Err(EngineError::invalid(path, format!("onset.step must be >= 0, got {}", o.step)));
    }

    let shader_paths = sj.shaders.iter().map(|p| assets.resolve(p)).collect();

    Ok(SketchConfig {
        path,
        from_file,
        title: sj.title,
        canvas: sj.canvas,
        vsync: sj.vsync,
        vertex_path: assets.resolve(&sj.vertex),
        shader_paths,
        slider: sj.slider,
        onset: sj.onset,
        flux: sj.flux,
    })
}

const TOP_LEVEL_KEYS: &[&str] = &[
    "version", "title", "canvas", "vsync", "vertex", "shaders", "slider", "onset", "flux",
];
const CANVAS_KEYS: &[&str] = &["width", "height"];
const SLIDER_KEYS: &[&str] = &[
    "min", "max", "default", "step", "x", "y", "width", "height", "visible",
];
const ONSET_KEYS: &[&str] = &["initial", "step"];

/// JSON-pointer-ish names of every field the schema does not know about.
fn unknown_fields(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    let Some(obj) = value.as_object() else {
        return out;
    };

    for (k, v) in obj {
        if !TOP_LEVEL_KEYS.contains(&k.as_str()) {
            out.push(format!("/{k}"));
            continue;
        }
        let nested = match k.as_str() {
            "canvas" => CANVAS_KEYS,
            "slider" => SLIDER_KEYS,
            "onset" => ONSET_KEYS,
            _ => continue,
        };
        if let Some(inner) = v.as_object() {
            for ik in inner.keys() {
                if !nested.contains(&ik.as_str()) {
                    out.push(format!("/{k}/{ik}"));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::testdir::TestDir;

    fn root(dir: &TestDir) -> AssetsRoot {
        AssetsRoot::search_upward(dir.path()).unwrap()
    }

    fn parse(dir: &TestDir, src: &str, mode: ConfigMode) -> Result<SketchConfig, EngineError> {
        let assets = root(dir);
        let path = assets.join("sketch.json");
        parse_sketch_config(&assets, path, src, mode)
    }

    #[test]
    fn missing_file_uses_builtin_defaults() {
        let dir = TestDir::new("cfg-missing");
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        let cfg = load_sketch_config(&root(&dir), ConfigMode::Strict).unwrap();

        assert!(!cfg.from_file);
        assert_eq!(cfg.canvas, CanvasCfg { width: 100, height: 100 });
        assert_eq!(cfg.shader_paths.len(), SLOT_COUNT);
        assert!(cfg.shader_paths[3].ends_with("shaders/OrganicNoise.frag"));
        assert!(cfg.vertex_path.ends_with("shaders/main.vert"));
        assert_eq!(cfg.slider, SliderCfg::default());
        assert_eq!(cfg.onset, OnsetCfg { initial: 0.1, step: 0.1 });
        assert_eq!(cfg.flux, 0.5);
        assert!(cfg.vsync);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let dir = TestDir::new("cfg-partial");
        dir.write("assets/sketch.json", r#"{ "slider": { "max": 2000.0 }, "flux": 0.25 }"#);
        let cfg = load_sketch_config(&root(&dir), ConfigMode::Lenient).unwrap();

        assert!(cfg.from_file);
        assert_eq!(cfg.slider.max, 2000.0);
        assert_eq!(cfg.slider.min, 100.0);
        assert_eq!(cfg.slider.width, 80.0);
        assert_eq!(cfg.flux, 0.25);
    }

    #[test]
    fn lenient_ignores_unknown_fields_strict_rejects_them() {
        let dir = TestDir::new("cfg-unknown");
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        let src = r#"{ "colour": "red", "slider": { "knob": 3 } }"#;

        assert!(parse(&dir, src, ConfigMode::Lenient).is_ok());

        let err = parse(&dir, src, ConfigMode::Strict).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/colour"), "{msg}");
        assert!(msg.contains("/slider/knob"), "{msg}");
    }

    #[test]
    fn strict_rejects_future_versions() {
        let dir = TestDir::new("cfg-version");
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        let src = r#"{ "version": 2 }"#;
        assert!(parse(&dir, src, ConfigMode::Lenient).is_ok());
        assert!(matches!(
            parse(&dir, src, ConfigMode::Strict),
            Err(EngineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn shader_list_must_have_nine_entries() {
        let dir = TestDir::new("cfg-count");
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        let err = parse(&dir, r#"{ "shaders": ["a.frag", "b.frag"] }"#, ConfigMode::Lenient).unwrap_err();
        assert!(err.to_string().contains("expected 9 shaders"));
    }

    #[test]
    fn semantic_errors_are_reported() {
        let dir = TestDir::new("cfg-semantic");
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();

        for src in [
            r#"{ "slider": { "min": 10.0, "max": 10.0 } }"#,
            r#"{ "slider": { "step": -1.0 } }"#,
            r#"{ "slider": { "width": 0.0 } }"#,
            r#"{ "canvas": { "width": 0 } }"#,
            r#"{ "onset": { "step": -0.1 } }"#,
        ] {
            assert!(
                matches!(parse(&dir, src, ConfigMode::Lenient), Err(EngineError::InvalidConfig { .. })),
                "{src} should be rejected"
            );
        }
    }

    #[test]
    fn negative_onset_step_is_rejected_in_both_modes() {
        let dir = TestDir::new("cfg-onset");
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        let src = r#"{ "onset": { "step": -0.1 } }"#;
        for mode in [ConfigMode::Lenient, ConfigMode::Strict] {
            let err = parse(&dir, src, mode).unwrap_err();
            assert!(err.to_string().contains("onset.step"), "{err}");
        }

        let cfg = parse(&dir, r#"{ "onset": { "step": 0.0 } }"#, ConfigMode::Strict).unwrap();
        assert_eq!(cfg.onset.step, 0.0);
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let dir = TestDir::new("cfg-bad");
        std::fs::create_dir_all(dir.path().join("assets")).unwrap();
        assert!(matches!(
            parse(&dir, "{ nope", ConfigMode::Lenient),
            Err(EngineError::Json { .. })
        ));
        assert!(matches!(
            parse(&dir, "[1, 2]", ConfigMode::Lenient),
            Err(EngineError::InvalidConfig { .. })
        ));
    }
}
