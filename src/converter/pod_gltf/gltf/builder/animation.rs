//! Animation methods for `GltfBuilder`

use glam::Mat4;

use super::super::types::{AnimationPath, GltfAccessor, GltfAnimationSampler, GltfBufferView};
use super::GltfBuilder;

/// Synthetic keyframe spacing: the POD tooling authors at 30 fps.
pub const KEYFRAME_TIME_STEP: f32 = 1.0 / 30.0;

impl GltfBuilder {
    /// Emit translation/rotation/scale channels for a node's matrix track.
    ///
    /// Each 4x4 keyframe matrix (column-major) is decomposed into TRS; one
    /// shared time accessor drives all three samplers.
    pub fn add_matrix_track(&mut self, node_index: usize, matrices: &[[f32; 16]]) {
        if matrices.is_empty() {
            return;
        }

        let mut translations = Vec::with_capacity(matrices.len() * 3);
        let mut rotations = Vec::with_capacity(matrices.len() * 4);
        let mut scales = Vec::with_capacity(matrices.len() * 3);

        for m in matrices {
            let (scale, rotation, translation) =
                Mat4::from_cols_array(m).to_scale_rotation_translation();
            translations.extend_from_slice(&translation.to_array());
            rotations.extend_from_slice(&rotation.to_array());
            scales.extend_from_slice(&scale.to_array());
        }

        let times: Vec<f32> = (0..matrices.len())
            .map(|i| i as f32 * KEYFRAME_TIME_STEP)
            .collect();
        let input = self.time_accessor(&times);

        let translation_output = self.keyframe_accessor(&translations, "VEC3", matrices.len());
        let rotation_output = self.keyframe_accessor(&rotations, "VEC4", matrices.len());
        let scale_output = self.keyframe_accessor(&scales, "VEC3", matrices.len());

        for (output, path) in [
            (translation_output, AnimationPath::Translation),
            (rotation_output, AnimationPath::Rotation),
            (scale_output, AnimationPath::Scale),
        ] {
            self.add_animation(
                GltfAnimationSampler {
                    input,
                    interpolation: Some("LINEAR".to_string()),
                    output,
                },
                node_index,
                path,
            );
        }
    }

    /// SCALAR float accessor with min/max, as animation inputs require.
    fn time_accessor(&mut self, times: &[f32]) -> usize {
        let bytes: Vec<u8> = times.iter().flat_map(|v| v.to_le_bytes()).collect();
        let byte_offset = self.append_binary(&bytes);
        let view = self.add_buffer_view(GltfBufferView {
            buffer: 0,
            byte_offset,
            byte_length: bytes.len(),
            byte_stride: None,
            target: None,
        });
        self.add_accessor(GltfAccessor {
            buffer_view: view,
            byte_offset: None,
            component_type: 5126, // FLOAT
            count: times.len(),
            accessor_type: "SCALAR".to_string(),
            min: times.first().map(|&t| vec![t]),
            max: times.last().map(|&t| vec![t]),
            normalized: None,
        })
    }

    fn keyframe_accessor(&mut self, values: &[f32], accessor_type: &str, count: usize) -> usize {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let byte_offset = self.append_binary(&bytes);
        let view = self.add_buffer_view(GltfBufferView {
            buffer: 0,
            byte_offset,
            byte_length: bytes.len(),
            byte_stride: None,
            target: None,
        });
        self.add_accessor(GltfAccessor {
            buffer_view: view,
            byte_offset: None,
            component_type: 5126,
            count,
            accessor_type: accessor_type.to_string(),
            min: None,
            max: None,
            normalized: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_track_emits_three_channels_and_a_shared_clock() {
        let mut builder = GltfBuilder::new();
        let identity = Mat4::IDENTITY.to_cols_array();
        let translated = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let frames = [identity, translated.to_cols_array()];
        builder.add_matrix_track(0, &frames);

        assert_eq!(builder.animation.samplers.len(), 3);
        assert_eq!(builder.animation.channels.len(), 3);
        // all three samplers share one time accessor
        let input = builder.animation.samplers[0].input;
        assert!(builder.animation.samplers.iter().all(|s| s.input == input));

        let time = &builder.accessors[input];
        assert_eq!(time.accessor_type, "SCALAR");
        assert_eq!(time.count, 2);
        assert_eq!(time.min, Some(vec![0.0]));
        assert_eq!(time.max, Some(vec![KEYFRAME_TIME_STEP]));

        let paths: Vec<&str> = builder
            .animation
            .channels
            .iter()
            .map(|c| c.target.path.as_str())
            .collect();
        assert_eq!(paths, vec!["translation", "rotation", "scale"]);
    }

    #[test]
    fn decomposition_recovers_translation_and_identity_rotation() {
        let mut builder = GltfBuilder::new();
        let frame = Mat4::from_translation(glam::Vec3::new(4.0, 0.0, -1.0)).to_cols_array();
        builder.add_matrix_track(0, &[frame]);

        let translation_out = builder.animation.samplers[0].output;
        let view = builder.buffer_views[builder.accessors[translation_out].buffer_view].clone();
        let floats: Vec<f32> = builder.buffer[view.byte_offset..view.byte_offset + 12]
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes(b.try_into().unwrap()))
            .collect();
        assert_eq!(floats, vec![4.0, 0.0, -1.0]);

        let rotation_out = builder.animation.samplers[1].output;
        let view = builder.buffer_views[builder.accessors[rotation_out].buffer_view].clone();
        let quat: Vec<f32> = builder.buffer[view.byte_offset..view.byte_offset + 16]
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes(b.try_into().unwrap()))
            .collect();
        // x, y, z, w identity
        assert_eq!(quat, vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn empty_track_adds_nothing() {
        let mut builder = GltfBuilder::new();
        builder.add_matrix_track(0, &[]);
        assert!(builder.animation.samplers.is_empty());
        assert!(builder.accessors.is_empty());
    }
}
