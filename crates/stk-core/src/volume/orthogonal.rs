//! Orthogonal slice query for display sinks.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};

use super::volume::Volume;
use crate::error::Result;

/// Survey axis of a volume laid out as `(inline, crossline, time)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurveyAxis {
    Inline,
    Crossline,
    Timeslice,
}

impl SurveyAxis {
    pub const ALL: [SurveyAxis; 3] = [SurveyAxis::Inline, SurveyAxis::Crossline, SurveyAxis::Timeslice];

    /// Volume axis index.
    pub fn axis(self) -> usize {
        match self {
            SurveyAxis::Inline => 0,
            SurveyAxis::Crossline => 1,
            SurveyAxis::Timeslice => 2,
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            SurveyAxis::Inline => "inline",
            SurveyAxis::Crossline => "crossline",
            SurveyAxis::Timeslice => "timeslice",
        }
    }
}

/// One labeled 2D cross-section with its crosshair position.
#[derive(Debug, Clone)]
pub struct LabeledSlice<B: Backend> {
    pub axis: SurveyAxis,
    pub index: usize,
    /// Slice samples, remaining axes in volume order.
    pub data: Tensor<B, 2>,
    /// Position of the other two selected indices inside this slice.
    pub crosshair: [usize; 2],
}

impl<B: Backend> LabeledSlice<B> {
    /// Title in the form `inline 150`.
    pub fn title(&self) -> String {
        format!("{} {}", self.axis.label(), self.index)
    }
}

/// Inline, crossline and timeslice sections through one voxel.
#[derive(Debug, Clone)]
pub struct OrthogonalSlices<B: Backend> {
    pub inline: LabeledSlice<B>,
    pub crossline: LabeledSlice<B>,
    pub timeslice: LabeledSlice<B>,
}

impl<B: Backend> OrthogonalSlices<B> {
    /// Iterate the three sections in axis order.
    pub fn iter(&self) -> impl Iterator<Item = &LabeledSlice<B>> {
        [&self.inline, &self.crossline, &self.timeslice].into_iter()
    }
}

impl<B: Backend> Volume<B> {
    /// Cut the three orthogonal sections through `(inline, crossline, timeslice)`.
    pub fn orthogonal_slices(
        &self,
        inline: usize,
        crossline: usize,
        timeslice: usize,
    ) -> Result<OrthogonalSlices<B>> {
        let indices = [inline, crossline, timeslice];
        let cut = |axis: SurveyAxis| -> Result<LabeledSlice<B>> {
            let a = axis.axis();
            let data = self.slice(a, indices[a])?;
            let mut rest = (0..3).filter(|&other| other != a).map(|other| indices[other]);
            let crosshair = [rest.next().unwrap_or(0), rest.next().unwrap_or(0)];
            Ok(LabeledSlice {
                axis,
                index: indices[a],
                data,
                crosshair,
            })
        };

        Ok(OrthogonalSlices {
            inline: cut(SurveyAxis::Inline)?,
            crossline: cut(SurveyAxis::Crossline)?,
            timeslice: cut(SurveyAxis::Timeslice)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StkError;
    use crate::volume::tensor_to_vec;
    use burn_ndarray::NdArray;

    type Backend = NdArray<f32>;

    #[test]
    fn test_orthogonal_slices() {
        let device = Default::default();
        let values: Vec<f32> = (0..(3 * 4 * 5)).map(|v| v as f32).collect();
        let volume = Volume::<Backend>::from_vec(values, [3, 4, 5], &device).unwrap();

        let slices = volume.orthogonal_slices(1, 2, 3).unwrap();

        assert_eq!(slices.inline.data.dims(), [4, 5]);
        assert_eq!(slices.inline.crosshair, [2, 3]);
        assert_eq!(slices.inline.title(), "inline 1");

        assert_eq!(slices.crossline.data.dims(), [3, 5]);
        assert_eq!(slices.crossline.crosshair, [1, 3]);

        assert_eq!(slices.timeslice.data.dims(), [3, 4]);
        assert_eq!(slices.timeslice.crosshair, [1, 2]);

        // All three sections meet at voxel (1, 2, 3) = 1*20 + 2*5 + 3
        let at = |s: &LabeledSlice<Backend>| {
            let cols = s.data.dims()[1];
            tensor_to_vec(s.data.clone()).unwrap()[s.crosshair[0] * cols + s.crosshair[1]]
        };
        for s in slices.iter() {
            assert_eq!(at(s), 33.0, "{}", s.title());
        }
    }

    #[test]
    fn test_orthogonal_slices_out_of_range() {
        let device = Default::default();
        let volume = Volume::<Backend>::from_vec(vec![0.0; 8], [2, 2, 2], &device).unwrap();
        let result = volume.orthogonal_slices(0, 5, 0);
        assert!(matches!(result, Err(StkError::IndexOutOfBounds { axis: 1, .. })));
    }
}
