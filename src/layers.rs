//! The five-layer "holographic" recipe.
//!
//! Each layer renders the same field with its own derived [`ParameterSet`];
//! the host stacks the canvases using the style in [`LayerDescriptor::css`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::ParameterSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerRole {
    Background,
    Shadow,
    Content,
    Highlight,
    Accent,
}

impl LayerRole {
    /// Bottom to top.
    pub const ALL: [LayerRole; 5] = [
        LayerRole::Background,
        LayerRole::Shadow,
        LayerRole::Content,
        LayerRole::Highlight,
        LayerRole::Accent,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayerRole::Background => "background",
            LayerRole::Shadow => "shadow",
            LayerRole::Content => "content",
            LayerRole::Highlight => "highlight",
            LayerRole::Accent => "accent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.name() == name)
    }

    /// DOM id of the canvas this layer draws into.
    pub fn canvas_id(self) -> String {
        format!("{}-canvas", self.name())
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static LayerDescriptor {
        &DESCRIPTORS[self.index()]
    }
}

impl fmt::Display for LayerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    Normal,
    Multiply,
    Screen,
    ColorDodge,
}

impl BlendMode {
    pub fn css(self) -> &'static str {
        match self {
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
            BlendMode::Screen => "screen",
            BlendMode::ColorDodge => "color-dodge",
        }
    }
}

/// How a layer's intensity relates to the canonical one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Intensity {
    Source,
    Fixed(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerFilter {
    pub blur_px: f32,
    pub brightness: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayerTransform {
    Identity,
    Translate { x_px: i32, y_px: i32 },
    Scale(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerDescriptor {
    pub role: LayerRole,
    pub density_factor: f32,
    pub speed_factor: f32,
    pub intensity: Intensity,
    pub hue_offset: f32,
    pub z_order: i32,
    pub opacity: f32,
    pub blend: BlendMode,
    pub filter: Option<LayerFilter>,
    pub transform: LayerTransform,
}

pub const DESCRIPTORS: [LayerDescriptor; 5] = [
    LayerDescriptor {
        role: LayerRole::Background,
        density_factor: 0.4,
        speed_factor: 0.2,
        intensity: Intensity::Fixed(0.2),
        hue_offset: 0.0,
        z_order: 1,
        opacity: 0.2,
        blend: BlendMode::Normal,
        filter: None,
        transform: LayerTransform::Identity,
    },
    LayerDescriptor {
        role: LayerRole::Shadow,
        density_factor: 0.8,
        speed_factor: 0.3,
        intensity: Intensity::Fixed(0.4),
        hue_offset: 180.0,
        z_order: 3,
        opacity: 0.6,
        blend: BlendMode::Multiply,
        filter: Some(LayerFilter { blur_px: 2.0, brightness: Some(0.7) }),
        transform: LayerTransform::Translate { x_px: 2, y_px: 2 },
    },
    LayerDescriptor {
        role: LayerRole::Content,
        density_factor: 1.0,
        speed_factor: 1.0,
        intensity: Intensity::Source,
        hue_offset: 0.0,
        z_order: 5,
        opacity: 0.8,
        blend: BlendMode::Normal,
        filter: None,
        transform: LayerTransform::Identity,
    },
    LayerDescriptor {
        role: LayerRole::Highlight,
        density_factor: 1.5,
        speed_factor: 0.8,
        intensity: Intensity::Fixed(0.6),
        hue_offset: 60.0,
        z_order: 7,
        opacity: 0.4,
        blend: BlendMode::Screen,
        filter: Some(LayerFilter { blur_px: 1.0, brightness: Some(1.5) }),
        transform: LayerTransform::Translate { x_px: -1, y_px: -1 },
    },
    LayerDescriptor {
        role: LayerRole::Accent,
        density_factor: 2.0,
        speed_factor: 0.4,
        intensity: Intensity::Fixed(0.3),
        hue_offset: 300.0,
        z_order: 15,
        opacity: 0.3,
        blend: BlendMode::ColorDodge,
        filter: Some(LayerFilter { blur_px: 2.0, brightness: None }),
        transform: LayerTransform::Scale(1.01),
    },
];

impl LayerDescriptor {
    /// Derive this layer's parameters. Geometry, chaos, morph and saturation
    /// pass through; hue is offset but not reduced mod 360.
    pub fn derive(&self, params: &ParameterSet) -> ParameterSet {
        ParameterSet {
            density: params.density * self.density_factor,
            speed: params.speed * self.speed_factor,
            intensity: match self.intensity {
                Intensity::Source => params.intensity,
                Intensity::Fixed(v) => v,
            },
            hue: params.hue + self.hue_offset,
            ..*params
        }
    }

    /// CSS declarations the host applies to this layer's canvas.
    pub fn css(&self) -> String {
        let mut css = format!(
            "z-index: {}; opacity: {}; mix-blend-mode: {};",
            self.z_order,
            self.opacity,
            self.blend.css()
        );
        if let Some(filter) = self.filter {
            css.push_str(&format!(" filter: blur({}px)", filter.blur_px));
            if let Some(b) = filter.brightness {
                css.push_str(&format!(" brightness({b})"));
            }
            css.push(';');
        }
        match self.transform {
            LayerTransform::Identity => {}
            LayerTransform::Translate { x_px, y_px } => {
                css.push_str(&format!(" transform: translate({x_px}px, {y_px}px);"))
            }
            LayerTransform::Scale(s) => css.push_str(&format!(" transform: scale({s});")),
        }
        css
    }
}

/// Parameters for all five layers, bottom to top.
pub fn derive_all(params: &ParameterSet) -> [(LayerRole, ParameterSet); 5] {
    LayerRole::ALL.map(|role| (role, role.descriptor().derive(params)))
}
