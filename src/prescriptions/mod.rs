//! Prescription uploads and medication extraction.
//!
//! There is no real extraction service. [`SimulatedPrescriptionReader`] stands
//! in for one and returns the first one to three entries of a bundled
//! catalogue.

use std::{cell::RefCell, fmt, fs, path::Path};

use mockall::automock;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::carts::models::CartItem;

/// Media types accepted for a prescription upload.
pub const ACCEPTED_MEDIA_TYPES: [&str; 4] =
    ["image/jpeg", "image/jpg", "image/png", "application/pdf"];

/// Largest accepted upload, 10 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Most medications a single prescription yields.
const MAX_EXTRACTED: usize = 3;

const CATALOGUE_YAML: &str = include_str!("catalogue.yml");

/// Prescription Errors
#[derive(Debug, Error)]
pub enum PrescriptionError {
    /// The file is not an image or PDF.
    #[error("unsupported file type `{0}`, upload a JPG, PNG or PDF")]
    UnsupportedType(String),

    /// The file is larger than [`MAX_UPLOAD_BYTES`].
    #[error("file is {size} bytes, the limit is {MAX_UPLOAD_BYTES} bytes")]
    TooLarge {
        /// Size of the rejected file.
        size: u64,
    },

    /// The file could not be inspected.
    #[error("failed to read `{path}`")]
    Io {
        /// Path of the upload.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The medication catalogue could not be parsed.
    #[error("failed to parse medication catalogue: {0}")]
    Catalogue(#[from] serde_norway::Error),

    /// A catalogue price is not `AMOUNT USD`.
    #[error("invalid catalogue price: {0}")]
    InvalidPrice(String),
}

/// A file offered for prescription reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrescriptionUpload {
    /// Name as given by the user.
    pub file_name: String,

    /// Media type guessed from the extension.
    pub media_type: String,

    /// File size.
    pub size_bytes: u64,
}

impl PrescriptionUpload {
    /// Describe a file on disk, guessing its media type from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`PrescriptionError::Io`] when the file metadata cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, PrescriptionError> {
        let metadata = fs::metadata(path).map_err(|source| PrescriptionError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let media_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();

        let file_name = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );

        Ok(Self {
            file_name,
            media_type,
            size_bytes: metadata.len(),
        })
    }

    /// Check the media type and size.
    ///
    /// # Errors
    ///
    /// Returns [`PrescriptionError::UnsupportedType`] or
    /// [`PrescriptionError::TooLarge`].
    pub fn validate(&self) -> Result<(), PrescriptionError> {
        if !ACCEPTED_MEDIA_TYPES.contains(&self.media_type.as_str()) {
            return Err(PrescriptionError::UnsupportedType(self.media_type.clone()));
        }

        if self.size_bytes > MAX_UPLOAD_BYTES {
            return Err(PrescriptionError::TooLarge {
                size: self.size_bytes,
            });
        }

        Ok(())
    }
}

/// Turns an upload into candidate cart items.
#[automock]
pub trait PrescriptionReader {
    /// Validate `upload` and extract one or more medications from it.
    ///
    /// # Errors
    ///
    /// Returns a [`PrescriptionError`] when the upload is rejected.
    fn read(&self, upload: &PrescriptionUpload) -> Result<Vec<CartItem>, PrescriptionError>;
}

#[derive(Debug, Deserialize)]
struct CatalogueFixture {
    medications: Vec<MedicationFixture>,
}

#[derive(Debug, Deserialize)]
struct MedicationFixture {
    name: String,
    dosage: String,
    frequency: String,
    duration: String,
    price: String,
}

/// Parse a catalogue price of the form `AMOUNT USD`.
fn parse_price(s: &str) -> Result<Decimal, PrescriptionError> {
    let invalid = || PrescriptionError::InvalidPrice(s.to_string());

    let (amount, currency) = s.trim().split_once(' ').ok_or_else(invalid)?;

    if currency.trim() != "USD" {
        return Err(invalid());
    }

    let amount = amount.parse::<Decimal>().map_err(|_err| invalid())?;

    if amount < Decimal::ZERO {
        return Err(invalid());
    }

    Ok(amount)
}

/// Load the bundled medication catalogue.
///
/// # Errors
///
/// Returns an error when the bundled YAML is malformed.
pub fn catalogue() -> Result<Vec<CartItem>, PrescriptionError> {
    parse_catalogue(CATALOGUE_YAML)
}

fn parse_catalogue(yaml: &str) -> Result<Vec<CartItem>, PrescriptionError> {
    let fixture: CatalogueFixture = serde_norway::from_str(yaml)?;

    fixture
        .medications
        .into_iter()
        .map(|medication| {
            Ok(CartItem {
                price: parse_price(&medication.price)?,
                name: medication.name,
                dosage: medication.dosage,
                frequency: medication.frequency,
                duration: medication.duration,
                quantity: 1,
            })
        })
        .collect()
}

/// Simulated reader returning a random-length prefix of the catalogue.
pub struct SimulatedPrescriptionReader {
    catalogue: Vec<CartItem>,
    rng: RefCell<StdRng>,
}

impl SimulatedPrescriptionReader {
    /// Reader over the bundled catalogue with an entropy-seeded generator.
    ///
    /// # Errors
    ///
    /// Returns an error when the bundled catalogue is malformed.
    pub fn new() -> Result<Self, PrescriptionError> {
        Ok(Self::with_rng(catalogue()?, StdRng::from_entropy()))
    }

    /// Reader over the bundled catalogue with a fixed seed.
    ///
    /// # Errors
    ///
    /// Returns an error when the bundled catalogue is malformed.
    pub fn with_seed(seed: u64) -> Result<Self, PrescriptionError> {
        Ok(Self::with_rng(catalogue()?, StdRng::seed_from_u64(seed)))
    }

    fn with_rng(catalogue: Vec<CartItem>, rng: StdRng) -> Self {
        Self {
            catalogue,
            rng: RefCell::new(rng),
        }
    }
}

impl fmt::Debug for SimulatedPrescriptionReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulatedPrescriptionReader")
            .field("catalogue", &self.catalogue.len())
            .finish_non_exhaustive()
    }
}

impl PrescriptionReader for SimulatedPrescriptionReader {
    fn read(&self, upload: &PrescriptionUpload) -> Result<Vec<CartItem>, PrescriptionError> {
        upload.validate()?;

        let limit = self.catalogue.len().min(MAX_EXTRACTED);

        if limit == 0 {
            debug!(file = %upload.file_name, "empty catalogue, nothing extracted");
            return Ok(Vec::new());
        }

        let count = self.rng.borrow_mut().gen_range(1..=limit);

        info!(file = %upload.file_name, count, "medications extracted from prescription");

        Ok(self.catalogue.iter().take(count).cloned().collect())
    }
}
