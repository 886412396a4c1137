//! CPU-side textures and cubemaps
//!
//! Textures keep their decoded texel data in memory together with the
//! properties a GPU backend needs to allocate storage (format, size, mip
//! count, sampling). Cubemaps are cut out of a single horizontal-cross image
//! or assembled from six separate face images.

use std::fmt;
use std::path::{Path, PathBuf};

use image::{ColorType, DynamicImage};
use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec4;

/// Texture loading and manipulation errors
#[derive(thiserror::Error, Debug)]
pub enum TextureError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image could not be decoded
    #[error("Failed to decode image {path}: {reason}")]
    Decode {
        /// Source file
        path: String,
        /// Decoder message
        reason: String,
    },

    /// Texture file does not exist
    #[error("Texture path does not exist: {0}")]
    NotFound(PathBuf),

    /// Cross image is not a 4x3 grid of square faces
    #[error("Cubemap layout is invalid: {width}x{height} is not a 4x3 face grid")]
    InvalidCubemapLayout {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Supplied texel data does not match the texture size
    #[error("Texture data size mismatch: expected {expected} bytes, got {actual}")]
    DataSizeMismatch {
        /// Required byte count
        expected: usize,
        /// Supplied byte count
        actual: usize,
    },

    /// Float texels given for a unorm format or bytes for a float format
    #[error("Texel storage does not match format {0}")]
    StorageMismatch(ImageFormat),
}

/// Pixel formats understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    /// Single 8-bit channel
    R8,
    /// Two 8-bit channels
    RG8,
    /// Linear 8-bit RGB
    RGB8,
    /// sRGB encoded 8-bit RGB
    SRGB8,
    /// Linear 8-bit RGBA
    RGBA8,
    /// sRGB encoded 8-bit RGBA
    SRGBA8,
    /// Single float channel
    R32F,
    /// Float RGB
    RGB32F,
    /// Float RGBA
    RGBA32F,
    /// Packed 24-bit depth and 8-bit stencil
    DEPTH24STENCIL8,
}

impl ImageFormat {
    /// Channels per texel
    pub fn channel_count(self) -> usize {
        match self {
            Self::R8 | Self::R32F | Self::DEPTH24STENCIL8 => 1,
            Self::RG8 => 2,
            Self::RGB8 | Self::SRGB8 | Self::RGB32F => 3,
            Self::RGBA8 | Self::SRGBA8 | Self::RGBA32F => 4,
        }
    }

    /// Bytes per channel
    pub fn bytes_per_channel(self) -> usize {
        match self {
            Self::R32F | Self::RGB32F | Self::RGBA32F | Self::DEPTH24STENCIL8 => 4,
            _ => 1,
        }
    }

    /// Bytes per texel
    pub fn bytes_per_texel(self) -> usize {
        self.channel_count() * self.bytes_per_channel()
    }

    /// Float formats
    pub fn is_hdr(self) -> bool {
        matches!(self, Self::R32F | Self::RGB32F | Self::RGBA32F)
    }

    /// Depth/stencil formats
    pub fn is_depth(self) -> bool {
        matches!(self, Self::DEPTH24STENCIL8)
    }

    /// sRGB encoded formats
    pub fn is_srgb(self) -> bool {
        matches!(self, Self::SRGB8 | Self::SRGBA8)
    }

    /// 8-bit format for a decoded channel count, `None` when unsupported
    pub fn from_channel_count(channels: usize, srgb: bool) -> Option<Self> {
        match (channels, srgb) {
            (1, _) => Some(Self::R8),
            (2, _) => Some(Self::RG8),
            (3, false) => Some(Self::RGB8),
            (3, true) => Some(Self::SRGB8),
            (4, false) => Some(Self::RGBA8),
            (4, true) => Some(Self::SRGBA8),
            _ => None,
        }
    }

    /// Float format for a decoded channel count
    pub fn hdr_from_channel_count(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::R32F),
            3 => Some(Self::RGB32F),
            4 => Some(Self::RGBA32F),
            _ => None,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::R8 => "R8",
            Self::RG8 => "RG8",
            Self::RGB8 => "RGB8",
            Self::SRGB8 => "SRGB8",
            Self::RGBA8 => "RGBA8",
            Self::SRGBA8 => "SRGBA8",
            Self::R32F => "R32F",
            Self::RGB32F => "RGB32F",
            Self::RGBA32F => "RGBA32F",
            Self::DEPTH24STENCIL8 => "DEPTH24STENCIL8",
        };
        f.write_str(name)
    }
}

/// Allocation parameters of a texture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureProperties {
    /// Texel format
    pub format: ImageFormat,
    /// Width in texels
    pub width: u32,
    /// Height in texels
    pub height: u32,
    /// Whether colour data is sRGB encoded
    pub srgb: bool,
}

impl TextureProperties {
    /// Properties for a format and size
    pub fn new(format: ImageFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
            srgb: format.is_srgb(),
        }
    }
}

/// Full mip chain length for a texture size
pub fn mip_levels(width: u32, height: u32) -> u32 {
    let largest = width.max(height);
    if largest == 0 {
        1
    } else {
        1 + largest.ilog2()
    }
}

/// Texture coordinate wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    /// Tile the texture
    Repeat,
    /// Clamp to the border texel
    ClampToEdge,
}

/// Texel filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    /// Bilinear, single mip
    Linear,
    /// Trilinear across mips
    LinearMipmapLinear,
}

/// Sampler state attached to a texture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureSampling {
    /// Wrap mode on every axis
    pub wrap: WrapMode,
    /// Minification filter
    pub min_filter: FilterMode,
    /// Magnification filter
    pub mag_filter: FilterMode,
    /// Anisotropic filtering level
    pub max_anisotropy: f32,
}

impl TextureSampling {
    /// Repeat wrapping, trilinear minification, 16x anisotropy
    pub fn texture_2d() -> Self {
        Self {
            wrap: WrapMode::Repeat,
            min_filter: FilterMode::LinearMipmapLinear,
            mag_filter: FilterMode::Linear,
            max_anisotropy: 16.0,
        }
    }

    /// Clamp-to-edge with linear filtering
    pub fn cubemap() -> Self {
        Self {
            wrap: WrapMode::ClampToEdge,
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            max_anisotropy: 1.0,
        }
    }
}

impl Default for TextureSampling {
    fn default() -> Self {
        Self::texture_2d()
    }
}

/// Texel storage, 8-bit or float depending on the format
#[derive(Debug, Clone, PartialEq)]
pub enum TextureData {
    /// Byte texels (unorm colour and packed depth)
    Unorm(Vec<u8>),
    /// Float texels
    Float(Vec<f32>),
}

impl TextureData {
    /// Zeroed storage for `texels` texels of `format`
    pub fn zeroed(format: ImageFormat, texels: usize) -> Self {
        if format.is_hdr() {
            Self::Float(vec![0.0; texels * format.channel_count()])
        } else {
            Self::Unorm(vec![0; texels * format.bytes_per_texel()])
        }
    }

    /// Size in bytes
    pub fn size_bytes(&self) -> usize {
        match self {
            Self::Unorm(bytes) => bytes.len(),
            Self::Float(floats) => floats.len() * std::mem::size_of::<f32>(),
        }
    }

    /// Raw bytes of the storage
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Unorm(bytes) => bytes,
            Self::Float(floats) => bytemuck::cast_slice(floats),
        }
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.size_bytes() == 0
    }

    /// Whether this storage kind is the one `format` uses
    pub fn matches_format(&self, format: ImageFormat) -> bool {
        match self {
            Self::Unorm(_) => !format.is_hdr(),
            Self::Float(_) => format.is_hdr(),
        }
    }
}

/// 2D texture with CPU-side texel data
#[derive(Debug, Clone)]
pub struct Texture2D {
    name: String,
    path: Option<PathBuf>,
    properties: TextureProperties,
    mip_levels: u32,
    sampling: TextureSampling,
    data: TextureData,
}

impl Texture2D {
    /// Allocate a zeroed texture
    pub fn new(width: u32, height: u32, format: ImageFormat) -> Self {
        Self::from_properties(TextureProperties::new(format, width, height))
    }

    /// Allocate a zeroed texture from properties
    pub fn from_properties(properties: TextureProperties) -> Self {
        let texels = properties.width as usize * properties.height as usize;
        Self {
            name: String::new(),
            path: None,
            properties,
            mip_levels: mip_levels(properties.width, properties.height),
            sampling: TextureSampling::texture_2d(),
            data: TextureData::zeroed(properties.format, texels),
        }
    }

    /// Decode an image file
    ///
    /// One, two, three and four channel 8-bit images keep their layout. Any
    /// other layout (16-bit, float) is converted to RGBA8.
    pub fn from_file(path: impl AsRef<Path>, srgb: bool, flip_vertically: bool) -> Result<Self, TextureError> {
        let path = path.as_ref();
        log::debug!("Loading texture from: {:?}", path);

        let image = image::open(path).map_err(|e| TextureError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let image = if flip_vertically { image.flipv() } else { image };
        let (width, height) = (image.width(), image.height());

        let (channels, bytes) = decode_unorm(image);
        let format = ImageFormat::from_channel_count(channels, srgb).unwrap_or(ImageFormat::RGBA8);

        let mut texture = Self::new(width, height, format);
        texture.properties.srgb = srgb;
        texture.data = TextureData::Unorm(bytes);
        texture.name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        texture.path = Some(path.to_path_buf());

        log::info!("Loaded texture {} ({}x{} {})", texture.name, width, height, format);
        Ok(texture)
    }

    /// Load a texture relative to the working directory
    pub fn load(path: impl AsRef<Path>, srgb: bool) -> Result<Self, TextureError> {
        let absolute = std::env::current_dir()?.join(path.as_ref());
        if !absolute.exists() {
            log::error!("Texture path does not exist: {}", absolute.display());
            return Err(TextureError::NotFound(absolute));
        }
        Self::from_file(&absolute, srgb, true)
    }

    /// Replace every texel, `bytes` must match the texture size exactly
    pub fn set_data(&mut self, bytes: &[u8]) -> Result<(), TextureError> {
        let expected = self.expected_size();
        if bytes.len() != expected {
            return Err(TextureError::DataSizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }
        self.data = if self.properties.format.is_hdr() {
            TextureData::Float(bytemuck::pod_collect_to_vec(bytes))
        } else {
            TextureData::Unorm(bytes.to_vec())
        };
        Ok(())
    }

    /// Reallocate zeroed storage at a new size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.properties.width = width;
        self.properties.height = height;
        self.mip_levels = mip_levels(width, height);
        self.data = TextureData::zeroed(self.properties.format, width as usize * height as usize);
        log::trace!("Resized texture {} to {}x{}", self.name, width, height);
    }

    /// Fill every texel with a colour
    ///
    /// Unorm formats quantise each channel. Depth formats store `color.x` as
    /// the depth value with a zero stencil.
    pub fn clear(&mut self, color: Vec4) {
        let format = self.properties.format;
        let channels = format.channel_count();
        match &mut self.data {
            TextureData::Float(floats) => {
                for texel in floats.chunks_exact_mut(channels) {
                    texel.copy_from_slice(&color.as_slice()[..channels]);
                }
            }
            TextureData::Unorm(bytes) if format.is_depth() => {
                let depth = (color.x.clamp(0.0, 1.0) * 16_777_215.0).round() as u32;
                let packed = (depth << 8).to_le_bytes();
                for texel in bytes.chunks_exact_mut(4) {
                    texel.copy_from_slice(&packed);
                }
            }
            TextureData::Unorm(bytes) => {
                let quantised: Vec<u8> = color.as_slice()[..channels]
                    .iter()
                    .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
                    .collect();
                for texel in bytes.chunks_exact_mut(channels) {
                    texel.copy_from_slice(&quantised);
                }
            }
        }
    }

    /// Set a display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source file, if loaded from disk
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Width in texels
    pub fn width(&self) -> u32 {
        self.properties.width
    }

    /// Height in texels
    pub fn height(&self) -> u32 {
        self.properties.height
    }

    /// Texel format
    pub fn format(&self) -> ImageFormat {
        self.properties.format
    }

    /// Allocation properties
    pub fn properties(&self) -> &TextureProperties {
        &self.properties
    }

    /// Mip chain length
    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }

    /// Sampler state
    pub fn sampling(&self) -> &TextureSampling {
        &self.sampling
    }

    /// Texel data
    pub fn data(&self) -> &TextureData {
        &self.data
    }

    fn expected_size(&self) -> usize {
        self.properties.width as usize * self.properties.height as usize * self.properties.format.bytes_per_texel()
    }
}

/// Cubemap face in upload order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    /// +X
    PositiveX,
    /// -X
    NegativeX,
    /// +Y
    PositiveY,
    /// -Y
    NegativeY,
    /// +Z
    PositiveZ,
    /// -Z
    NegativeZ,
}

impl CubeFace {
    /// Every face in upload order
    pub const ALL: [CubeFace; 6] = [
        Self::PositiveX,
        Self::NegativeX,
        Self::PositiveY,
        Self::NegativeY,
        Self::PositiveZ,
        Self::NegativeZ,
    ];

    /// Index in upload order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Cell of this face in the 4x3 horizontal cross, as (column, row)
    pub fn cross_offset(self) -> (u32, u32) {
        match self {
            Self::PositiveX => (2, 1),
            Self::NegativeX => (0, 1),
            Self::PositiveY => (1, 0),
            Self::NegativeY => (1, 2),
            Self::PositiveZ => (1, 1),
            Self::NegativeZ => (3, 1),
        }
    }
}

/// Texels of one cubemap face
#[derive(Debug, Clone, PartialEq)]
pub struct FaceData {
    /// Face width in texels
    pub width: u32,
    /// Face height in texels
    pub height: u32,
    /// Face format
    pub format: ImageFormat,
    /// Texel data
    pub data: TextureData,
}

impl FaceData {
    fn empty(format: ImageFormat) -> Self {
        Self {
            width: 0,
            height: 0,
            format,
            data: TextureData::Unorm(Vec::new()),
        }
    }

    /// Whether the face failed to load
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Six-faced environment texture
#[derive(Debug, Clone)]
pub struct Cubemap {
    name: String,
    path: Option<PathBuf>,
    properties: TextureProperties,
    sampling: TextureSampling,
    faces: [FaceData; 6],
}

impl Cubemap {
    /// Load a horizontal-cross image, `.hdr` files keep float texels
    pub fn from_cross_image(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        log::debug!("Loading cubemap from: {:?}", path);

        let image = image::open(path).map_err(|e| TextureError::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let (width, height) = (image.width(), image.height());
        let is_hdr = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("hdr"));

        let (format, data) = if is_hdr {
            if image.color().has_alpha() {
                (ImageFormat::RGBA32F, TextureData::Float(image.into_rgba32f().into_raw()))
            } else {
                (ImageFormat::RGB32F, TextureData::Float(image.into_rgb32f().into_raw()))
            }
        } else {
            let (channels, bytes) = decode_unorm(image);
            let format = ImageFormat::from_channel_count(channels, false).unwrap_or(ImageFormat::RGBA8);
            (format, TextureData::Unorm(bytes))
        };

        let mut cubemap = Self::from_cross_data(width, height, format, &data).map_err(|e| {
            log::error!("Cubemap texture layout is invalid: {}", path.display());
            e
        })?;
        cubemap.name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        cubemap.path = Some(path.to_path_buf());

        log::info!("Loaded cubemap {} ({} faces of {})", cubemap.name, 6, cubemap.properties.width);
        Ok(cubemap)
    }

    /// Cut six faces out of horizontal-cross texel data
    pub fn from_cross_data(
        width: u32,
        height: u32,
        format: ImageFormat,
        data: &TextureData,
    ) -> Result<Self, TextureError> {
        let face_size = width / 4;
        if face_size == 0 || width != face_size * 4 || height != face_size * 3 {
            return Err(TextureError::InvalidCubemapLayout { width, height });
        }
        if !data.matches_format(format) {
            return Err(TextureError::StorageMismatch(format));
        }

        let channels = format.channel_count();
        let expected = width as usize * height as usize * format.bytes_per_texel();
        if data.size_bytes() != expected {
            return Err(TextureError::DataSizeMismatch {
                expected,
                actual: data.size_bytes(),
            });
        }

        let faces = CubeFace::ALL.map(|face| {
            let cut = match data {
                TextureData::Unorm(bytes) => {
                    TextureData::Unorm(extract_face(bytes, width, face_size, channels * format.bytes_per_channel(), face))
                }
                TextureData::Float(floats) => TextureData::Float(extract_face(floats, width, face_size, channels, face)),
            };
            FaceData {
                width: face_size,
                height: face_size,
                format,
                data: cut,
            }
        });

        Ok(Self {
            name: String::new(),
            path: None,
            properties: TextureProperties::new(format, face_size, face_size),
            sampling: TextureSampling::cubemap(),
            faces,
        })
    }

    /// Load six separate face images in +X, -X, +Y, -Y, +Z, -Z order
    ///
    /// A face that fails to load is logged and left empty.
    pub fn from_faces<P: AsRef<Path>>(paths: &[P; 6]) -> Self {
        let mut faces: [FaceData; 6] = std::array::from_fn(|_| FaceData::empty(ImageFormat::RGBA8));
        let mut properties: Option<TextureProperties> = None;

        for (slot, path) in faces.iter_mut().zip(paths.iter()) {
            let path = path.as_ref();
            match image::open(path) {
                Ok(image) => {
                    let (width, height) = (image.width(), image.height());
                    let (channels, bytes) = decode_unorm(image);
                    let format = ImageFormat::from_channel_count(channels, false).unwrap_or(ImageFormat::RGBA8);
                    properties.get_or_insert_with(|| TextureProperties::new(format, width, height));
                    *slot = FaceData {
                        width,
                        height,
                        format,
                        data: TextureData::Unorm(bytes),
                    };
                }
                Err(e) => log::error!("Cubemap texture failed to load at path: {} ({})", path.display(), e),
            }
        }

        Self {
            name: String::new(),
            path: None,
            properties: properties.unwrap_or_else(|| TextureProperties::new(ImageFormat::RGBA8, 0, 0)),
            sampling: TextureSampling::cubemap(),
            faces,
        }
    }

    /// Texels of one face
    pub fn face(&self, face: CubeFace) -> &FaceData {
        &self.faces[face.index()]
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source file for cross images
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Face size and format
    pub fn properties(&self) -> &TextureProperties {
        &self.properties
    }

    /// Sampler state
    pub fn sampling(&self) -> &TextureSampling {
        &self.sampling
    }

    /// Mip chain length of each face
    pub fn mip_levels(&self) -> u32 {
        mip_levels(self.properties.width, self.properties.height)
    }
}

/// Copy one face's rows out of a cross image, `stride` elements per texel
fn extract_face<T: Copy>(src: &[T], width: u32, face_size: u32, stride: usize, face: CubeFace) -> Vec<T> {
    let (column, row) = face.cross_offset();
    let face_size = face_size as usize;
    let width = width as usize;
    let offset_x = column as usize * face_size;
    let offset_y = row as usize * face_size;
    let row_len = face_size * stride;

    let mut out = Vec::with_capacity(face_size * row_len);
    for y in 0..face_size {
        let start = ((offset_y + y) * width + offset_x) * stride;
        out.extend_from_slice(&src[start..start + row_len]);
    }
    out
}

/// Decode to 8-bit channels, keeping 1/2/3/4 channel layouts
fn decode_unorm(image: DynamicImage) -> (usize, Vec<u8>) {
    match image.color() {
        ColorType::L8 => (1, image.into_luma8().into_raw()),
        ColorType::La8 => (2, image.into_luma_alpha8().into_raw()),
        ColorType::Rgb8 => (3, image.into_rgb8().into_raw()),
        _ => (4, image.into_rgba8().into_raw()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross_rgb(face: u32) -> (u32, u32, Vec<u8>) {
        // each texel stores its cell (column, row) so faces are identifiable
        let (width, height) = (face * 4, face * 3);
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x / face) as u8, (y / face) as u8, 7]);
            }
        }
        (width, height, data)
    }

    #[test]
    fn test_mip_levels() {
        assert_eq!(mip_levels(1, 1), 1);
        assert_eq!(mip_levels(256, 128), 9);
        assert_eq!(mip_levels(300, 20), 9);
        assert_eq!(mip_levels(0, 0), 1);
    }

    #[test]
    fn test_format_channels() {
        assert_eq!(ImageFormat::SRGB8.channel_count(), 3);
        assert_eq!(ImageFormat::RGBA32F.bytes_per_texel(), 16);
        assert!(ImageFormat::DEPTH24STENCIL8.is_depth());
        assert_eq!(ImageFormat::from_channel_count(4, true), Some(ImageFormat::SRGBA8));
        assert_eq!(ImageFormat::RG8.to_string(), "RG8");
    }

    #[test]
    fn test_cross_faces_come_from_grid_cells() {
        let (width, height, data) = cross_rgb(2);
        let cubemap = Cubemap::from_cross_data(width, height, ImageFormat::RGB8, &TextureData::Unorm(data)).unwrap();

        for face in CubeFace::ALL {
            let face_data = cubemap.face(face);
            assert_eq!(face_data.width, 2);
            let TextureData::Unorm(bytes) = &face_data.data else {
                panic!("expected byte texels");
            };
            let (column, row) = face.cross_offset();
            for texel in bytes.chunks_exact(3) {
                assert_eq!(texel, &[column as u8, row as u8, 7]);
            }
        }
    }

    #[test]
    fn test_invalid_cross_layout_is_rejected() {
        let data = TextureData::Unorm(vec![0; 8 * 8 * 3]);
        let result = Cubemap::from_cross_data(8, 8, ImageFormat::RGB8, &data);
        assert!(matches!(result, Err(TextureError::InvalidCubemapLayout { width: 8, height: 8 })));
    }

    #[test]
    fn test_cross_storage_must_match_format() {
        let floats = TextureData::Float(vec![0.0; 48]);
        let result = Cubemap::from_cross_data(8, 6, ImageFormat::RGBA8, &floats);
        assert!(matches!(result, Err(TextureError::StorageMismatch(ImageFormat::RGBA8))));

        let bytes = TextureData::Unorm(vec![0; 12 * 4]);
        let result = Cubemap::from_cross_data(4, 3, ImageFormat::R32F, &bytes);
        assert!(matches!(result, Err(TextureError::StorageMismatch(ImageFormat::R32F))));
    }

    #[test]
    fn test_hdr_cross_keeps_floats() {
        let face = 1;
        let floats: Vec<f32> = (0..12).map(|i| i as f32 * 0.5).collect();
        let cubemap =
            Cubemap::from_cross_data(4 * face, 3 * face, ImageFormat::R32F, &TextureData::Float(floats)).unwrap();
        assert_eq!(cubemap.face(CubeFace::PositiveX).data, TextureData::Float(vec![3.0]));
        assert_eq!(cubemap.face(CubeFace::NegativeZ).data, TextureData::Float(vec![3.5]));
        assert_eq!(cubemap.sampling().wrap, WrapMode::ClampToEdge);
    }

    #[test]
    fn test_set_data_checks_size() {
        let mut texture = Texture2D::new(2, 2, ImageFormat::RGBA8);
        assert!(texture.set_data(&[255; 16]).is_ok());
        assert!(matches!(
            texture.set_data(&[0; 3]),
            Err(TextureError::DataSizeMismatch { expected: 16, actual: 3 })
        ));
    }

    #[test]
    fn test_clear_and_resize() {
        let mut texture = Texture2D::new(2, 1, ImageFormat::RGB8);
        texture.clear(Vec4::new(1.0, 0.0, 0.5, 1.0));
        assert_eq!(texture.data().as_bytes(), &[255, 0, 128, 255, 0, 128]);

        texture.resize(4, 4);
        assert_eq!(texture.mip_levels(), 3);
        assert_eq!(texture.data().size_bytes(), 4 * 4 * 3);
    }

    #[test]
    fn test_from_file_flips_and_maps_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        let image = image::RgbaImage::from_fn(1, 2, |_, y| image::Rgba([y as u8 * 100, 0, 0, 255]));
        image.save(&path).unwrap();

        let texture = Texture2D::from_file(&path, true, true).unwrap();
        assert_eq!(texture.format(), ImageFormat::SRGBA8);
        assert_eq!(texture.name(), "gradient.png");
        // flipped: the bottom row comes first
        assert_eq!(&texture.data().as_bytes()[..4], &[100, 0, 0, 255]);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let result = Texture2D::load("definitely/missing/texture.png", false);
        assert!(matches!(result, Err(TextureError::NotFound(_))));
    }

    #[test]
    fn test_from_faces_keeps_going_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("face.png");
        image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3])).save(&good).unwrap();
        let missing = dir.path().join("missing.png");

        let paths = [&good, &missing, &good, &good, &good, &good];
        let cubemap = Cubemap::from_faces(&paths);
        assert!(cubemap.face(CubeFace::NegativeX).is_empty());
        assert_eq!(cubemap.face(CubeFace::PositiveZ).format, ImageFormat::RGB8);
        assert_eq!(cubemap.properties().width, 2);
    }
}
