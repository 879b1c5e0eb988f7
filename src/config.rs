use serde_derive::Deserialize;

use crate::errors::*;
use crate::grid_dimensions::GridDimensions;
use crate::units::{Height, PathsCount, Width};

/// Size of the grid to generate and, for a garland field, how many paths to grow on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    #[serde(default)]
    pub path_count: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            width: 20,
            height: 20,
            path_count: None,
        }
    }
}

impl GridConfig {
    pub fn dimensions(&self) -> Result<GridDimensions> {
        GridDimensions::new(Width(self.width), Height(self.height))
    }

    /// The path count, checked against the number of cells.
    pub fn paths(&self) -> Result<Option<PathsCount>> {
        let dimensions = self.dimensions()?;
        match self.path_count {
            Some(paths) if paths > dimensions.size().0 => {
                bail!(ErrorKind::TooManyPaths(paths, dimensions.size().0))
            }
            Some(paths) => Ok(Some(PathsCount(paths))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn default_is_a_20_by_20_maze() {
        let config = GridConfig::default();
        let dims = config.dimensions().unwrap();
        assert_eq!((dims.width(), dims.height()), (Width(20), Height(20)));
        assert_eq!(config.paths().unwrap(), None);
    }

    #[test]
    fn validation() {
        let config = GridConfig { width: 0, height: 3, path_count: None };
        assert!(config.dimensions().is_err());
        assert!(config.paths().is_err());

        let config = GridConfig { width: 2, height: 3, path_count: Some(6) };
        assert_eq!(config.paths().unwrap(), Some(PathsCount(6)));

        let config = GridConfig { path_count: Some(7), ..config };
        match *config.paths().unwrap_err().kind() {
            ErrorKind::TooManyPaths(7, 6) => {}
            ref other => panic!("unexpected error kind {:?}", other),
        }
    }
}
