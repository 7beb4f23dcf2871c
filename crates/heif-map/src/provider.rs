//! HEIF map provider: answers map queries from one georeferenced image.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use map_common::{BoundingBox, CrsCode, MapError, MapResult, OutputFormat};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::config::ProviderConfig;
use crate::decode::{ContainerDecoder, ImageDecoder, PixelSourceAdapter};
use crate::encode::{encode_raster, EncodeOptions};
use crate::error::QueryError;
use crate::georef::Georeferencer;
use crate::types::BandMapping;
use crate::warp::{warp, WarpTarget};

/// Default output width in pixels.
pub const DEFAULT_WIDTH: i64 = 500;
/// Default output height in pixels.
pub const DEFAULT_HEIGHT: i64 = 300;
/// Default request CRS.
pub const DEFAULT_QUERY_CRS: &str = "CRS84";
/// Default output format key.
pub const DEFAULT_FORMAT: &str = "png";

/// A map request.
#[derive(Debug, Clone, PartialEq)]
pub struct MapQuery {
    /// Accepted and ignored.
    pub style: Option<String>,
    /// `[minx, miny, maxx, maxy]` in `crs`.
    pub bbox: Vec<f64>,
    pub width: i64,
    pub height: i64,
    pub crs: String,
    /// Accepted and ignored; the source has no time dimension.
    pub datetime: Option<String>,
    /// Output format key: `png` or `jpeg`.
    pub format: String,
    pub transparent: bool,
    /// Extra request options, accepted and ignored.
    pub extra: HashMap<String, String>,
}

impl Default for MapQuery {
    fn default() -> Self {
        Self {
            style: None,
            bbox: Vec::new(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            crs: DEFAULT_QUERY_CRS.to_string(),
            datetime: None,
            format: DEFAULT_FORMAT.to_string(),
            transparent: true,
            extra: HashMap::new(),
        }
    }
}

impl MapQuery {
    /// Query for `bbox` with all other fields at their defaults.
    pub fn new(bbox: [f64; 4]) -> Self {
        Self {
            bbox: bbox.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_size(mut self, width: i64, height: i64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = crs.into();
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    pub fn with_datetime(mut self, datetime: impl Into<String>) -> Self {
        self.datetime = Some(datetime.into());
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Where the source bytes come from.
#[derive(Debug, Clone)]
enum SourceData {
    File(PathBuf),
    Memory(Bytes),
}

impl SourceData {
    fn read(&self) -> MapResult<Bytes> {
        match self {
            SourceData::File(path) => std::fs::read(path)
                .map(Bytes::from)
                .map_err(|e| MapError::decode(format!("{}: {}", path.display(), e))),
            SourceData::Memory(bytes) => Ok(bytes.clone()),
        }
    }
}

/// Map provider backed by a single HEIF (or other still) image.
///
/// The provider holds only immutable configuration; every query decodes,
/// georeferences, warps and encodes from scratch, so one instance can serve
/// concurrent queries.
pub struct HeifMapProvider {
    config: ProviderConfig,
    source: SourceData,
    adapter: PixelSourceAdapter,
    georeferencer: Georeferencer,
    vsimem_prefix: String,
}

impl HeifMapProvider {
    /// Provider reading `config.data` on every query.
    pub fn new(config: ProviderConfig) -> Result<Self, QueryError> {
        let source = SourceData::File(config.data.clone());
        Self::build(config, source).map_err(QueryError::from)
    }

    /// Provider over in-memory source bytes; `config.data` is only used for
    /// display.
    pub fn from_bytes(bytes: impl Into<Bytes>, config: ProviderConfig) -> Result<Self, QueryError> {
        Self::build(config, SourceData::Memory(bytes.into())).map_err(QueryError::from)
    }

    fn build(config: ProviderConfig, source: SourceData) -> MapResult<Self> {
        config.validate()?;
        let georeferencer = Georeferencer::new(config.options.bbox, config.crs)?;
        let adapter = PixelSourceAdapter::new(Arc::new(ContainerDecoder), config.rotation()?);
        let vsimem_prefix = format!("heifmap-{}", Uuid::new_v4().simple());

        debug!(
            data = %config.data.display(),
            crs = %config.crs,
            bbox = %config.options.bbox,
            rotation = config.rotation_degrees,
            resampling = %config.resampling,
            "Created HEIF map provider"
        );

        Ok(Self {
            config,
            source,
            adapter,
            georeferencer,
            vsimem_prefix,
        })
    }

    /// Replace the image decoder.
    pub fn with_decoder(mut self, decoder: Arc<dyn ImageDecoder>) -> Self {
        self.adapter = self.adapter.with_decoder(decoder);
        self
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// CRS of the native extent.
    pub fn crs(&self) -> CrsCode {
        self.config.crs
    }

    pub fn native_extent(&self) -> &BoundingBox {
        self.georeferencer.extent()
    }

    /// Prefix of the virtual files this provider creates.
    pub fn vsimem_prefix(&self) -> &str {
        &self.vsimem_prefix
    }

    /// Render the map for `query`.
    #[instrument(
        skip(self, query),
        fields(bbox = ?query.bbox, width = query.width, height = query.height, crs = %query.crs, format = %query.format)
    )]
    pub fn query(&self, query: &MapQuery) -> Result<Vec<u8>, QueryError> {
        self.render(query).map_err(|e| {
            warn!(error = %e, "Map query failed");
            QueryError::from(e)
        })
    }

    fn render(&self, query: &MapQuery) -> MapResult<Vec<u8>> {
        // Validate before touching the source
        let format = OutputFormat::from_key(&query.format)?;
        let target = self.warp_target(query)?;
        self.log_ignored(query);

        let data = self.source.read()?;
        let decoded = self.adapter.load(&data)?;
        drop(data);

        let mapping = BandMapping::for_mode(decoded.mode);
        let raster = self.georeferencer.georeference(&decoded.grid, &mapping)?;
        drop(decoded);

        debug!("Clipping dataset to map query");
        let warped = warp(&raster, &target, self.config.resampling)?;
        drop(raster);

        let options = EncodeOptions {
            transparent: query.transparent,
            jpeg_quality: self.config.jpeg_quality,
        };
        let bytes = encode_raster(&warped, format, &options, &self.vsimem_prefix)?;
        debug!(bytes = bytes.len(), format = %format, "Rendered map");
        Ok(bytes)
    }

    fn warp_target(&self, query: &MapQuery) -> MapResult<WarpTarget> {
        if query.bbox.is_empty() {
            return Err(MapError::warp("bbox is required"));
        }
        let bbox = BoundingBox::from_slice(&query.bbox)?;
        let crs = CrsCode::parse(&query.crs)?;
        WarpTarget::new(bbox, crs, query.width, query.height)
    }

    fn log_ignored(&self, query: &MapQuery) {
        if let Some(datetime) = &query.datetime {
            debug!(datetime = %datetime, "datetime is not supported by this provider, ignoring");
        }
        if let Some(style) = &query.style {
            debug!(style = %style, "style is not supported by this provider, ignoring");
        }
        if !query.extra.is_empty() {
            debug!(options = ?query.extra.keys().collect::<Vec<_>>(), "Ignoring extra query options");
        }
    }
}

impl fmt::Display for HeifMapProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<HEIFMapProvider> {}", self.config.data.display())
    }
}

impl fmt::Debug for HeifMapProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeifMapProvider")
            .field("config", &self.config)
            .field("adapter", &self.adapter)
            .field("vsimem_prefix", &self.vsimem_prefix)
            .finish()
    }
}
