//! Ready-made capability implementations

mod fixed;
mod nominatim;
mod table;

pub use fixed::FixedPositioning;
pub use nominatim::NominatimGeocoder;
pub use table::TableGeocoder;

use crate::capability::Geocoder;
use crate::config::{GeocoderConfig, GeocoderProvider};
use crate::error::{LocationError, Result};
use std::sync::Arc;

/// Build the geocoder selected by `config.provider`.
pub fn build_geocoder(config: &GeocoderConfig) -> Result<Arc<dyn Geocoder>> {
    match config.provider {
        GeocoderProvider::Nominatim => Ok(Arc::new(NominatimGeocoder::new(config)?)),
        GeocoderProvider::Table => {
            let path = config
                .table_path
                .as_deref()
                .ok_or_else(|| LocationError::config("geocoder.table_path is required for the table provider"))?;
            let table = TableGeocoder::from_json_file(path).map_err(|e| {
                LocationError::config(format!("failed to load {}: {e}", path.display()))
            })?;
            Ok(Arc::new(table))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_table_provider_requires_path() {
        let config = GeocoderConfig {
            provider: GeocoderProvider::Table,
            ..GeocoderConfig::default()
        };
        assert!(matches!(build_geocoder(&config), Err(LocationError::Config(_))));
    }

    #[tokio::test]
    async fn test_table_provider_loads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Main St 1": {{"latitude": 1.0, "longitude": 2.0}}}}"#).unwrap();

        let config = GeocoderConfig {
            provider: GeocoderProvider::Table,
            table_path: Some(file.path().to_path_buf()),
            ..GeocoderConfig::default()
        };

        let geocoder = build_geocoder(&config).unwrap();
        assert_eq!(geocoder.geocode("main st 1").await.unwrap().len(), 1);
    }
}
