//! Scalar field storage
//!
//! Macroscopic quantities (density, velocity components, concentration,
//! sterilization effect) are stored as flat `Vec<f32>` fields in row-major
//! order, `index = y * width + x`.

/// Scalar field over the lattice
#[derive(Debug, Clone, PartialEq)]
pub struct FieldData {
    /// Field values in row-major order (y * width + x)
    pub data: Vec<f32>,
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
}

impl FieldData {
    /// Create a new field initialized to zero
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_value(width, height, 0.0)
    }

    /// Create a new field with every cell set to `value`
    #[must_use]
    pub fn with_value(width: usize, height: usize, value: f32) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    /// Get reference to field data
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        self.data[y * self.width + x]
    }

    /// Set value at grid position
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        assert!(
            x < self.width && y < self.height,
            "Coordinates out of bounds"
        );
        self.data[y * self.width + x] = value;
    }

    /// Fill entire field with a value
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Number of cells
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the field has no cells
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation() {
        let field = FieldData::new(10, 20);
        assert_eq!(field.width, 10);
        assert_eq!(field.height, 20);
        assert_eq!(field.len(), 200);
        assert!(field.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_field_get_set_row_major() {
        let mut field = FieldData::with_value(10, 10, 1.0);
        field.set(3, 4, 0.25);
        assert_eq!(field.get(3, 4), 0.25);
        assert_eq!(field.data[4 * 10 + 3], 0.25);
        field.fill(0.5);
        assert!(field.as_slice().iter().all(|&v| v == 0.5));
    }

    #[test]
    #[should_panic(expected = "Coordinates out of bounds")]
    fn test_field_get_out_of_bounds() {
        let field = FieldData::new(4, 4);
        let _ = field.get(4, 0);
    }
}
