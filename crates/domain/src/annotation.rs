#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingBox {
    pub label: String,
    pub xmin: i64,
    pub ymin: i64,
    pub xmax: i64,
    pub ymax: i64,
}

impl BoundingBox {
    pub fn width(&self) -> i64 {
        self.xmax.saturating_sub(self.xmin).max(0)
    }

    pub fn height(&self) -> i64 {
        self.ymax.saturating_sub(self.ymin).max(0)
    }
}

/// Labelled boxes read from one VOC annotation file, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub objects: Vec<BoundingBox>,
}

impl Annotation {
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
