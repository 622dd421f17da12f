use voc_verifier_domain::{Annotation, Sample, SampleLocation, StatusCounts, Subset};

pub fn present_status(counts: &StatusCounts) -> String {
    counts.to_string()
}

pub fn present_sample_row(sample: &Sample, location: SampleLocation) -> String {
    let tag = match location {
        SampleLocation::Live => "live",
        SampleLocation::Quarantined => "quarantined",
    };
    format!("{}\t{}\t{}", sample.subset(), tag, sample.file_name())
}

pub fn present_subset_counts(subset: Subset, live: usize, quarantined: usize) -> String {
    format!("{subset}\tlive={live}\tquarantined={quarantined}")
}

pub fn present_annotation(sample: &Sample, annotation: &Annotation) -> Vec<String> {
    let mut lines = vec![format!("{} ({} objects)", sample, annotation.objects.len())];
    lines.extend(annotation.objects.iter().map(|object| {
        format!(
            "  {}\t[{}, {}, {}, {}]",
            object.label, object.xmin, object.ymin, object.xmax, object.ymax
        )
    }));
    lines
}
