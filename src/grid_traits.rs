use crate::cells::Coordinate;

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: Coordinate) -> String {
        String::from("   ")
    }
}
