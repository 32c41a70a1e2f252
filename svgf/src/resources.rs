use fxhash::{FxHashMap, FxHashSet};
use glam::UVec2;
use log::debug;

use crate::{DenoiserError, Texture};

/// Names of the buffers exchanged with the surrounding renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channels {
    pub direct: String,
    pub indirect: String,
    pub output: String,
}

impl Channels {
    pub const LINEAR_Z: &'static str = "svgf_linear_z";
    pub const MOTION_VECTORS: &'static str = "svgf_motion_vectors";
    pub const COMPACT_NORM_DEPTH: &'static str = "svgf_compact_norm_depth";
    pub const DIRECT_ALBEDO: &'static str = "direct_albedo";
    pub const INDIRECT_ALBEDO: &'static str = "indirect_albedo";

    pub fn new(
        direct: impl ToString,
        indirect: impl ToString,
        output: impl ToString,
    ) -> Self {
        Self {
            direct: direct.to_string(),
            indirect: indirect.to_string(),
            output: output.to_string(),
        }
    }

    /// Returns names of all the inputs, in the order of [`FrameInputs`]'s
    /// fields.
    pub fn inputs(&self) -> [&str; 7] {
        [
            self.direct.as_str(),
            self.indirect.as_str(),
            Self::DIRECT_ALBEDO,
            Self::INDIRECT_ALBEDO,
            Self::LINEAR_Z,
            Self::MOTION_VECTORS,
            Self::COMPACT_NORM_DEPTH,
        ]
    }
}

impl Default for Channels {
    fn default() -> Self {
        Self::new("direct_illumination", "indirect_illumination", "hdr_color")
    }
}

/// Registry of named, screen-sized textures shared between the denoiser and
/// the passes around it.
///
/// Textures are only ever allocated for channels someone requested, and only
/// once the screen size is known.
#[derive(Debug, Default)]
pub struct Resources {
    requested: FxHashSet<String>,
    textures: FxHashMap<String, Texture>,
    size: Option<UVec2>,
}

impl Resources {
    pub fn new() -> Self {
        Default::default()
    }

    /// Declares that `name` is going to be used; if the screen size is
    /// already known, the texture gets allocated right away.
    pub fn request_texture(&mut self, name: impl ToString) {
        let name = name.to_string();

        if let Some(size) = self.size {
            self.textures
                .entry(name.clone())
                .or_insert_with(|| Texture::new(&name, size));
        }

        self.requested.insert(name);
    }

    /// (Re)allocates all of the requested textures; zero-sized resizes are
    /// ignored.
    pub fn resize(&mut self, size: UVec2) {
        if size.x == 0 || size.y == 0 {
            return;
        }

        debug!("Resizing resources; size={:?}", size);

        self.size = Some(size);

        self.textures = self
            .requested
            .iter()
            .map(|name| (name.clone(), Texture::new(name, size)))
            .collect();
    }

    pub fn size(&self) -> Option<UVec2> {
        self.size
    }

    pub fn is_requested(&self, name: &str) -> bool {
        self.requested.contains(name)
    }

    pub fn texture(&self, name: &str) -> Option<&Texture> {
        self.textures.get(name)
    }

    pub fn texture_mut(&mut self, name: &str) -> Option<&mut Texture> {
        self.textures.get_mut(name)
    }

    /// Replaces the texture of given channel, e.g. with a frame rendered
    /// elsewhere.
    pub fn insert(&mut self, name: impl ToString, texture: Texture) {
        self.textures.insert(name.to_string(), texture);
    }

    /// Temporarily takes the texture out of the registry, so that it can be
    /// written while others are being read.
    pub fn take(&mut self, name: &str) -> Option<Texture> {
        self.textures.remove(name)
    }
}

/// Per-frame inputs of the denoiser.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs<'a> {
    /// Demodulated direct illumination.
    pub direct: &'a Texture,

    /// Demodulated indirect illumination.
    pub indirect: &'a Texture,

    pub direct_albedo: &'a Texture,
    pub indirect_albedo: &'a Texture,

    /// See: [`svgf_gpu::LinearZ`].
    pub linear_z: &'a Texture,

    /// Screen-space motion vectors in `xy`, in pixels, pointing from the
    /// current position of a pixel to its previous one.
    pub motion_vectors: &'a Texture,

    /// See: [`svgf_gpu::CompactNormDepth`].
    pub compact_norm_depth: &'a Texture,
}

impl<'a> FrameInputs<'a> {
    pub fn from_resources(
        resources: &'a Resources,
        channels: &Channels,
    ) -> Result<Self, DenoiserError> {
        let get = |name: &str| {
            resources
                .texture(name)
                .ok_or_else(|| DenoiserError::MissingInput(name.to_owned()))
        };

        Ok(Self {
            direct: get(&channels.direct)?,
            indirect: get(&channels.indirect)?,
            direct_albedo: get(Channels::DIRECT_ALBEDO)?,
            indirect_albedo: get(Channels::INDIRECT_ALBEDO)?,
            linear_z: get(Channels::LINEAR_Z)?,
            motion_vectors: get(Channels::MOTION_VECTORS)?,
            compact_norm_depth: get(Channels::COMPACT_NORM_DEPTH)?,
        })
    }

    fn all(&self) -> [&'a Texture; 7] {
        [
            self.direct,
            self.indirect,
            self.direct_albedo,
            self.indirect_albedo,
            self.linear_z,
            self.motion_vectors,
            self.compact_norm_depth,
        ]
    }

    /// Checks that all of the inputs have the expected size.
    pub fn validate(&self, size: UVec2) -> Result<(), DenoiserError> {
        for texture in self.all() {
            if texture.size() != size {
                return Err(DenoiserError::InputSizeMismatch {
                    channel: texture.label().to_owned(),
                    expected: size,
                    got: texture.size(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use glam::uvec2;

    use super::*;

    #[test]
    fn allocation() {
        let mut target = Resources::new();

        target.request_texture("a");

        assert!(target.texture("a").is_none());

        target.resize(uvec2(4, 2));
        target.request_texture("b");

        assert_eq!(uvec2(4, 2), target.texture("a").unwrap().size());
        assert_eq!(uvec2(4, 2), target.texture("b").unwrap().size());
        assert!(target.texture("c").is_none());

        target.resize(uvec2(0, 10));

        assert_eq!(Some(uvec2(4, 2)), target.size());
        assert_eq!(uvec2(4, 2), target.texture("a").unwrap().size());
    }

    #[test]
    fn take_and_insert() {
        let mut target = Resources::new();

        target.request_texture("a");
        target.resize(uvec2(1, 1));

        let texture = target.take("a").unwrap();

        assert!(target.texture("a").is_none());

        target.insert("a", texture);

        assert!(target.texture("a").is_some());
    }

    #[test]
    fn missing_inputs() {
        let mut resources = Resources::new();
        let channels = Channels::default();

        for name in channels.inputs().into_iter().skip(1) {
            resources.request_texture(name);
        }

        resources.resize(uvec2(2, 2));

        let err = FrameInputs::from_resources(&resources, &channels)
            .unwrap_err();

        assert!(matches!(
            err,
            DenoiserError::MissingInput(name) if name == "direct_illumination"
        ));
    }
}
