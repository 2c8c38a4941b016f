//! Config validation (friendly errors)
//!
//! Purpose:
//! - Catch common misconfigurations before the window opens
//! - Explain *what* is wrong, *where* it lives, and *what to do*
//! - Keep running where possible: only missing shader files stop startup, and they would
//!   fail to load anyway

use std::collections::HashMap;

use shaderkeys_engine::config::SketchConfig;
use shaderkeys_engine::shaders::ShaderSlot;

use crate::{loge, logi, logw};

#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub level: IssueLevel,
    pub path: String,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    Warn,
    Error,
}

impl ValidationIssue {
    pub fn warn(path: impl Into<String>, message: impl Into<String>, hint: Option<String>) -> Self {
        Self { level: IssueLevel::Warn, path: path.into(), message: message.into(), hint }
    }
    pub fn error(path: impl Into<String>, message: impl Into<String>, hint: Option<String>) -> Self {
        Self { level: IssueLevel::Error, path: path.into(), message: message.into(), hint }
    }
}

pub fn emit_issues(tag: &str, issues: &[ValidationIssue]) {
    for it in issues {
        let line = match &it.hint {
            Some(h) => format!("{}: {} (hint: {})", it.path, it.message, h),
            None => format!("{}: {}", it.path, it.message),
        };
        match it.level {
            IssueLevel::Warn => logw!(tag, "{line}"),
            IssueLevel::Error => loge!(tag, "{line}"),
        }
    }
}

/// One-line summary, also when there are zero issues, so the log shows validation ran.
pub fn emit_summary(tag: &str, label: &str, issues: &[ValidationIssue]) {
    let warns = issues.iter().filter(|i| i.level == IssueLevel::Warn).count();
    let errs = issues.iter().filter(|i| i.level == IssueLevel::Error).count();
    if errs == 0 && warns == 0 {
        logi!(tag, "validation: {label} OK (0 issues)");
    } else {
        logw!(tag, "validation: {label} issues found (errors={errs} warnings={warns})");
    }
}

pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.level == IssueLevel::Error)
}

/// Check a resolved config for things that parse fine but will surprise at runtime.
pub fn validate_sketch(cfg: &SketchConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let s = &cfg.slider;
    if s.default < s.min || s.default > s.max {
        let clamped = s.default.clamp(s.min, s.max);
        issues.push(ValidationIssue::warn(
            "sketch.json:/slider/default",
            format!("default {} lies outside [{}, {}]", s.default, s.min, s.max),
            Some(format!("the slider starts at {clamped}; set a default inside the range to silence this")),
        ));
    }

    if s.x + s.width > cfg.canvas.width as f32 || s.y + s.height > cfg.canvas.height as f32 {
        issues.push(ValidationIssue::warn(
            "sketch.json:/slider",
            format!(
                "slider extends past the initial {}x{} canvas",
                cfg.canvas.width, cfg.canvas.height
            ),
            Some("it becomes reachable once the window grows or goes fullscreen".into()),
        ));
    }

    if cfg.onset.step == 0.0 {
        issues.push(ValidationIssue::warn(
            "sketch.json:/onset/step",
            "step is 0, so the space bar has no effect",
            None,
        ));
    }

    if !cfg.vertex_path.is_file() {
        issues.push(ValidationIssue::error(
            "sketch.json:/vertex",
            format!("vertex shader not found: {}", cfg.vertex_path.display()),
            Some("paths are relative to the assets directory".into()),
        ));
    }

    let mut first_use: HashMap<&std::path::Path, ShaderSlot> = HashMap::new();
    for (slot, path) in ShaderSlot::ALL.into_iter().zip(cfg.shader_paths.iter()) {
        let ptr = format!("sketch.json:/shaders/{}", slot.index());
        if !path.is_file() {
            issues.push(ValidationIssue::error(
                ptr.clone(),
                format!("fragment shader for key {} not found: {}", slot.number(), path.display()),
                Some("paths are relative to the assets directory".into()),
            ));
        }
        if let Some(prev) = first_use.get(path.as_path()) {
            issues.push(ValidationIssue::warn(
                ptr,
                format!("key {} loads the same file as key {}", slot.number(), prev.number()),
                Some("allowed, but the two keys will look identical".into()),
            ));
        } else {
            first_use.insert(path.as_path(), slot);
        }
    }

    issues
}
