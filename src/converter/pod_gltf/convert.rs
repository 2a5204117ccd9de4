//! Scene-level conversion entry points.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::formats::pod::PodScene;

use super::gltf::GltfBuilder;
use super::gltf::materials::{
    GltfMaterial, GltfNormalTextureInfo, GltfPbrMetallicRoughness, GltfTextureInfo,
};
use super::gltf::types::GltfNode;
use super::overrides::{MaterialOverrides, SamplerKind};
use super::{PodPhase, PodProgress, PodProgressCallback};

/// Convert a decoded scene to GLB bytes.
///
/// # Errors
/// Returns an error if any mesh, attribute, or document reference fails;
/// no partial output is produced.
pub fn convert_scene_to_glb(scene: &PodScene) -> Result<Vec<u8>> {
    convert_scene_to_glb_with_progress(scene, &|_| {})
}

/// Convert a decoded scene to GLB bytes, reporting progress.
///
/// # Errors
/// Returns an error if any mesh, attribute, or document reference fails.
pub fn convert_scene_to_glb_with_progress(
    scene: &PodScene,
    progress: PodProgressCallback,
) -> Result<Vec<u8>> {
    let builder = build_scene(scene, None, progress)?;
    progress(&PodProgress::new(PodPhase::WritingOutput, 5, 5));
    let glb = builder.build_glb()?;
    progress(&PodProgress::new(PodPhase::Complete, 5, 5));
    Ok(glb)
}

/// Convert a decoded scene to GLB bytes, with textures and materials driven
/// by a sidecar descriptor.
///
/// # Errors
/// Returns an error if any mesh, attribute, or document reference fails.
pub fn convert_scene_to_glb_with_overrides(
    scene: &PodScene,
    overrides: &MaterialOverrides,
) -> Result<Vec<u8>> {
    build_scene(scene, Some(overrides), &|_| {})?.build_glb()
}

/// Convert a scene and write the GLB to disk.
///
/// # Errors
/// Returns an error if conversion or file writing fails.
pub fn export_scene_to_glb(scene: &PodScene, path: &Path) -> Result<()> {
    build_scene(scene, None, &|_| {})?.export_glb(path)
}

/// Convert a scene and write separate .gltf and .bin files.
///
/// # Errors
/// Returns an error if conversion or file writing fails.
pub fn export_scene_to_gltf(scene: &PodScene, path: &Path) -> Result<()> {
    build_scene(scene, None, &|_| {})?.export_gltf(path)
}

fn build_scene(
    scene: &PodScene,
    overrides: Option<&MaterialOverrides>,
    progress: PodProgressCallback,
) -> Result<GltfBuilder> {
    let mut builder = GltfBuilder::new();

    progress(&PodProgress::with_detail(
        PodPhase::ConvertingMeshes,
        1,
        5,
        format!("{} meshes", scene.meshes.len()),
    ));
    for (mesh_index, mesh) in scene.meshes.iter().enumerate() {
        builder.add_pod_mesh(mesh_index, mesh)?;
    }

    progress(&PodProgress::new(PodPhase::ConvertingNodes, 2, 5));
    convert_nodes(&mut builder, scene)?;

    progress(&PodProgress::new(PodPhase::ConvertingTextures, 3, 5));
    let bindings = match overrides {
        Some(overrides) => Some(convert_override_textures(&mut builder, overrides)),
        None => {
            convert_textures(&mut builder, scene);
            None
        }
    };

    progress(&PodProgress::new(PodPhase::ConvertingMaterials, 4, 5));
    match bindings {
        Some(bindings) => convert_override_materials(&mut builder, scene, &bindings),
        None => {
            for material in &scene.materials {
                builder.add_pod_material(material);
            }
        }
    }

    Ok(builder)
}

fn convert_nodes(builder: &mut GltfBuilder, scene: &PodScene) -> Result<()> {
    for (node_index, node) in scene.nodes.iter().enumerate() {
        let children = scene.children_of(node_index);
        let mesh = (node.mesh_index >= 0).then_some(node.mesh_index as usize);

        if let Some(mesh_index) = mesh {
            if node.material_index >= 0 {
                // materials are translated later; the reference is
                // validated against the finished arrays at export
                builder.set_mesh_material(mesh_index, node.material_index as usize)?;
            }
        }

        if node.is_root() {
            debug!(name = %node.name, "scene root");
            builder.add_root_node(node_index);
        }

        builder.add_node(GltfNode {
            name: Some(node.name.clone()),
            mesh,
            skin: None,
            children,
            translation: Some(node.animation.position.unwrap_or([0.0, 0.0, 0.0])),
            rotation: Some(node.animation.rotation.unwrap_or([0.0, 0.0, 0.0, 1.0])),
            scale: Some(node.animation.scale.unwrap_or([1.0, 1.0, 1.0])),
        });

        if let Some(matrices) = &node.animation.matrices {
            builder.add_matrix_track(node_index, matrices);
        }
    }
    Ok(())
}

fn convert_textures(builder: &mut GltfBuilder, scene: &PodScene) {
    for texture in &scene.textures {
        let image = builder.add_image_uri(texture.png_uri());
        let sampler = builder.add_sampler();
        builder.add_texture(image, Some(sampler), Some(texture.name.clone()));
    }
}

/// Texture indices resolved per material name from the sidecar descriptor.
#[derive(Debug, Clone, Default)]
struct ResolvedBindings {
    albedo: Option<(usize, Option<usize>)>,
    normal: Option<(usize, Option<usize>)>,
    mask: Option<(usize, Option<usize>)>,
    has_alpha: bool,
    double_sided: bool,
}

fn convert_override_textures(
    builder: &mut GltfBuilder,
    overrides: &MaterialOverrides,
) -> HashMap<String, ResolvedBindings> {
    let mut resolved = HashMap::new();
    for material in overrides.materials() {
        let entry: &mut ResolvedBindings = resolved.entry(material.name.clone()).or_default();
        entry.double_sided = material.double_sided();
        for sampler in &material.samplers {
            let image = builder.add_image_uri(sampler.png_uri());
            let sampler_index = builder.add_sampler_custom(sampler.gltf_sampler());
            let texture =
                builder.add_texture(image, Some(sampler_index), Some(sampler.name.clone()));
            let binding = (texture, sampler.uv_set);
            match sampler.kind() {
                SamplerKind::Albedo => entry.albedo = Some(binding),
                SamplerKind::Normal => entry.normal = Some(binding),
                SamplerKind::Mask => entry.mask = Some(binding),
                SamplerKind::Alpha => entry.has_alpha = true,
                SamplerKind::Other => {
                    debug!(name = %sampler.name, "ignoring unrecognized sampler binding");
                }
            }
        }
    }
    resolved
}

fn convert_override_materials(
    builder: &mut GltfBuilder,
    scene: &PodScene,
    bindings: &HashMap<String, ResolvedBindings>,
) {
    for material in &scene.materials {
        let Some(resolved) = bindings.get(&material.name) else {
            // no descriptor entry: fall back to the scene's own tables
            builder.add_pod_material(material);
            continue;
        };

        let mut pbr = GltfPbrMetallicRoughness {
            metallic_factor: Some(0.0),
            roughness_factor: Some(super::gltf::shininess_to_roughness(material.shininess)),
            ..GltfPbrMetallicRoughness::default()
        };
        if let Some((index, uv)) = resolved.albedo {
            pbr.base_color_texture = Some(GltfTextureInfo {
                index,
                tex_coord: uv,
            });
        } else {
            let [r, g, b] = material.diffuse;
            pbr.base_color_factor = Some([r, g, b, 1.0]);
        }

        builder.add_material(GltfMaterial {
            name: Some(material.name.clone()),
            pbr_metallic_roughness: Some(pbr),
            normal_texture: resolved.normal.map(|(index, uv)| GltfNormalTextureInfo {
                index,
                scale: None,
                tex_coord: uv,
            }),
            occlusion_texture: None,
            emissive_texture: resolved.mask.map(|(index, uv)| GltfTextureInfo {
                index,
                tex_coord: uv,
            }),
            alpha_mode: resolved.has_alpha.then(|| "BLEND".to_string()),
            double_sided: Some(resolved.double_sided),
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::formats::pod::{
        IndexType, PodMaterial, PodMesh, PodNode, PodTexture, VertexDataType, VertexElement,
    };

    use super::*;

    fn one_triangle() -> PodMesh {
        let mut mesh = PodMesh::new(3);
        let mut blob = Vec::new();
        for pos in [[0.0f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            for v in pos {
                blob.extend_from_slice(&v.to_le_bytes());
            }
        }
        let data_index = mesh.add_vertex_data(blob);
        mesh.add_element(
            "POSITION",
            VertexElement::new("POSITION", VertexDataType::Float, 3, 12, 0, data_index).unwrap(),
        )
        .unwrap();
        let mut indices = Vec::new();
        for i in [0u16, 1, 2] {
            indices.extend_from_slice(&i.to_le_bytes());
        }
        mesh.add_faces(indices, IndexType::U16);
        mesh
    }

    fn two_node_scene() -> PodScene {
        let mut scene = PodScene::default();
        scene.meshes.push(one_triangle());
        scene.materials.push(PodMaterial::new("mat"));

        let mut root = PodNode::new("root");
        root.mesh_index = 0;
        root.material_index = 0;
        scene.nodes.push(root);

        let mut child = PodNode::new("child");
        child.parent_index = 0;
        child.animation.position = Some([0.0, 5.0, 0.0]);
        scene.nodes.push(child);

        scene
    }

    #[test]
    fn children_derive_from_parent_indices() {
        let builder = build_scene(&two_node_scene(), None, &|_| {}).unwrap();
        assert_eq!(builder.nodes.len(), 2);
        assert_eq!(builder.nodes[0].children, vec![1]);
        assert!(builder.nodes[1].children.is_empty());
        // only the parentless node is a scene root
        assert_eq!(builder.scene_nodes, vec![0]);
    }

    #[test]
    fn transform_defaults_are_identity() {
        let builder = build_scene(&two_node_scene(), None, &|_| {}).unwrap();
        let root = &builder.nodes[0];
        assert_eq!(root.translation, Some([0.0, 0.0, 0.0]));
        assert_eq!(root.rotation, Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(root.scale, Some([1.0, 1.0, 1.0]));
        assert_eq!(builder.nodes[1].translation, Some([0.0, 5.0, 0.0]));
    }

    #[test]
    fn node_material_lands_on_the_primitive() {
        let builder = build_scene(&two_node_scene(), None, &|_| {}).unwrap();
        assert_eq!(builder.nodes[0].mesh, Some(0));
        assert_eq!(builder.meshes[0].primitives[0].material, Some(0));
    }

    #[test]
    fn plain_textures_get_default_samplers() {
        let mut scene = two_node_scene();
        scene.textures.push(PodTexture::new("skin"));
        let builder = build_scene(&scene, None, &|_| {}).unwrap();
        assert_eq!(builder.images.len(), 1);
        assert_eq!(builder.samplers.len(), 1);
        assert_eq!(builder.textures.len(), 1);
        assert_eq!(builder.images[0].uri.as_deref(), Some("skin.png"));
    }

    #[test]
    fn overrides_drive_textures_and_alpha_mode() {
        let xml = r#"
            <Model Name="m">
              <Materials>
                <Material Name="mat">
                  <Sampler2D Name="uAlbedoTexture">
                    <FileName>mat_d.tga</FileName>
                    <UVIdx>1</UVIdx>
                  </Sampler2D>
                  <Sampler2D Name="uAlphaTexture">
                    <FileName>mat_a.tga</FileName>
                  </Sampler2D>
                </Material>
              </Materials>
            </Model>"#;
        let overrides = MaterialOverrides::from_xml(xml).unwrap();
        let builder = build_scene(&two_node_scene(), Some(&overrides), &|_| {}).unwrap();

        // albedo and alpha both become textures; only albedo is referenced
        assert_eq!(builder.textures.len(), 2);
        let material = &builder.materials[0];
        let pbr = material.pbr_metallic_roughness.as_ref().unwrap();
        let base = pbr.base_color_texture.as_ref().unwrap();
        assert_eq!(base.index, 0);
        assert_eq!(base.tex_coord, Some(1));
        assert_eq!(material.alpha_mode.as_deref(), Some("BLEND"));
        assert_eq!(material.double_sided, Some(true));
    }

    #[test]
    fn whole_scene_converts_to_a_wellformed_glb() {
        let glb = convert_scene_to_glb(&two_node_scene()).unwrap();
        assert_eq!(&glb[0..4], b"glTF");
        let declared = u32::from_le_bytes(glb[8..12].try_into().unwrap()) as usize;
        assert_eq!(declared, glb.len());
    }
}
