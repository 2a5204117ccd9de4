use macpvr::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;

fn synthetic_scene() -> PodScene {
    // 3 vertices interleaved POSITION + NORMAL at stride 24, 1 triangle
    let mut mesh = PodMesh::new(3);
    let mut blob = Vec::new();
    for (pos, norm) in [
        ([0.0f32, 0.0, 0.0], [0.0f32, 0.0, 1.0]),
        ([2.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 3.0, -1.0], [0.0, 0.0, 1.0]),
    ] {
        for v in pos.iter().chain(norm.iter()) {
            blob.extend_from_slice(&v.to_le_bytes());
        }
    }
    let data_index = mesh.add_vertex_data(blob);
    mesh.add_element(
        "POSITION",
        VertexElement::new("POSITION", VertexDataType::Float, 3, 24, 0, data_index).unwrap(),
    )
    .unwrap();
    mesh.add_element(
        "NORMAL",
        VertexElement::new("NORMAL", VertexDataType::Float, 3, 24, 12, data_index).unwrap(),
    )
    .unwrap();
    let mut indices = Vec::new();
    for i in [0u16, 1, 2] {
        indices.extend_from_slice(&i.to_le_bytes());
    }
    mesh.add_faces(indices, IndexType::U16);

    let mut scene = PodScene::default();
    scene.meshes.push(mesh);

    let mut node = PodNode::new("triangle");
    node.mesh_index = 0;
    scene.nodes.push(node);

    scene
}

fn glb_json(glb: &[u8]) -> Value {
    assert_eq!(&glb[0..4], b"glTF");
    assert_eq!(u32::from_le_bytes(glb[4..8].try_into().unwrap()), 2);
    let total = u32::from_le_bytes(glb[8..12].try_into().unwrap()) as usize;
    assert_eq!(total, glb.len(), "declared total length must match the file");

    let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
    assert_eq!(json_len % 4, 0);
    assert_eq!(&glb[16..20], b"JSON");
    serde_json::from_slice(&glb[20..20 + json_len]).expect("JSON chunk must parse")
}

#[test]
fn synthetic_scene_round_trips_through_glb() {
    let glb = convert_scene_to_glb(&synthetic_scene()).unwrap();
    let json = glb_json(&glb);

    // 1 index accessor + POSITION + NORMAL
    let accessors = json["accessors"].as_array().unwrap();
    assert_eq!(accessors.len(), 3);

    // index view + one shared vertex view
    let views = json["bufferViews"].as_array().unwrap();
    assert_eq!(views.len(), 2);

    let primitive = &json["meshes"][0]["primitives"][0];
    assert_eq!(primitive["mode"], 4);
    let attrs = primitive["attributes"].as_object().unwrap();
    assert_eq!(attrs.len(), 2);

    let pos = &accessors[attrs["POSITION"].as_u64().unwrap() as usize];
    let norm = &accessors[attrs["NORMAL"].as_u64().unwrap() as usize];
    assert_eq!(pos["bufferView"], norm["bufferView"]);
    assert_eq!(pos["componentType"], 5126);
    assert_eq!(pos["type"], "VEC3");
    assert_eq!(pos["count"], 3);
    assert_eq!(pos["min"], serde_json::json!([0.0, 0.0, -1.0]));
    assert_eq!(pos["max"], serde_json::json!([2.0, 3.0, 0.0]));
    assert!(norm.get("min").is_none());

    // shared view carries the interleaved stride and vertex-array target
    let shared = &views[pos["bufferView"].as_u64().unwrap() as usize];
    assert_eq!(shared["byteStride"], 24);
    assert_eq!(shared["target"], 34962);

    // indices: 16-bit source width, SCALAR, element-array target
    let indices = &accessors[primitive["indices"].as_u64().unwrap() as usize];
    assert_eq!(indices["componentType"], 5123);
    assert_eq!(indices["type"], "SCALAR");
    assert_eq!(indices["count"], 3);
    assert_eq!(views[indices["bufferView"].as_u64().unwrap() as usize]["target"], 34963);

    // declared buffer length matches the BIN payload, not its padding
    let json_len = u32::from_le_bytes(glb[12..16].try_into().unwrap()) as usize;
    let bin_offset = 12 + 8 + json_len;
    let bin_len = u32::from_le_bytes(glb[bin_offset..bin_offset + 4].try_into().unwrap()) as usize;
    assert_eq!(&glb[bin_offset + 4..bin_offset + 8], b"BIN\0");
    let declared_buffer = json["buffers"][0]["byteLength"].as_u64().unwrap() as usize;
    assert!(declared_buffer <= bin_len);
    assert!(bin_len - declared_buffer < 4);
}

#[test]
fn scene_root_and_node_wiring_survive_serialization() {
    let glb = convert_scene_to_glb(&synthetic_scene()).unwrap();
    let json = glb_json(&glb);

    assert_eq!(json["scene"], 0);
    assert_eq!(json["scenes"][0]["nodes"], serde_json::json!([0]));
    assert_eq!(json["nodes"][0]["name"], "triangle");
    assert_eq!(json["nodes"][0]["mesh"], 0);
    assert_eq!(json["nodes"][0]["rotation"], serde_json::json!([0.0, 0.0, 0.0, 1.0]));
}

#[test]
fn animated_node_emits_three_channels_per_track() {
    let mut scene = synthetic_scene();
    let frames: Vec<[f32; 16]> = (0..4)
        .map(|i| {
            glam::Mat4::from_translation(glam::Vec3::new(i as f32, 0.0, 0.0)).to_cols_array()
        })
        .collect();
    scene.nodes[0].animation.matrices = Some(frames);

    let glb = convert_scene_to_glb(&scene).unwrap();
    let json = glb_json(&glb);

    let animation = &json["animations"][0];
    let samplers = animation["samplers"].as_array().unwrap();
    let channels = animation["channels"].as_array().unwrap();
    assert_eq!(samplers.len(), 3);
    assert_eq!(channels.len(), 3);
    for (i, channel) in channels.iter().enumerate() {
        assert_eq!(channel["sampler"].as_u64().unwrap() as usize, i);
        assert_eq!(channel["target"]["node"], 0);
    }
    let paths: Vec<&str> = channels
        .iter()
        .map(|c| c["target"]["path"].as_str().unwrap())
        .collect();
    assert_eq!(paths, vec!["translation", "rotation", "scale"]);

    // shared clock with min/max, one output per channel
    let input = samplers[0]["input"].as_u64().unwrap();
    assert!(samplers.iter().all(|s| s["input"].as_u64().unwrap() == input));
    let time = &json["accessors"][input as usize];
    assert_eq!(time["count"], 4);
    assert_eq!(time["min"], serde_json::json!([0.0]));
}

#[test]
fn untextured_scene_emits_no_material_arrays() {
    let glb = convert_scene_to_glb(&synthetic_scene()).unwrap();
    let json = glb_json(&glb);
    // empty arrays are omitted entirely rather than serialized as []
    assert!(json.get("materials").is_none());
    assert!(json.get("textures").is_none());
    assert!(json.get("images").is_none());
    assert!(json.get("samplers").is_none());
    assert!(json.get("animations").is_none());
    assert!(json.get("skins").is_none());
}

#[test]
fn export_writes_glb_and_gltf_files() {
    let dir = tempfile::tempdir().unwrap();
    let scene = synthetic_scene();

    let glb_path = dir.path().join("out.glb");
    export_scene_to_glb(&scene, &glb_path).unwrap();
    let bytes = std::fs::read(&glb_path).unwrap();
    assert_eq!(&bytes[0..4], b"glTF");

    let gltf_path = dir.path().join("out.gltf");
    export_scene_to_gltf(&scene, &gltf_path).unwrap();
    let json: Value =
        serde_json::from_str(&std::fs::read_to_string(&gltf_path).unwrap()).unwrap();
    assert_eq!(json["buffers"][0]["uri"], "out.bin");
    let bin = std::fs::read(dir.path().join("out.bin")).unwrap();
    assert_eq!(
        json["buffers"][0]["byteLength"].as_u64().unwrap() as usize,
        bin.len()
    );
}

#[test]
fn pvr_texture_end_to_end() {
    // PVR3 ETC1 8x8 with 3 mips: 32 + 8 + 8 payload bytes
    let words = [
        0x03525650u32, // magic
        0,
        6, // ETC1
        0,
        0,
        0,
        8, // height
        8, // width
        1,
        1,
        1,
        3, // mips
        0,
    ];
    let mut data = Vec::new();
    for w in words {
        data.extend_from_slice(&w.to_le_bytes());
    }
    data.extend(std::iter::repeat_n(0x5Au8, 48));

    let texture = PvrTexture::parse(&data).unwrap();
    assert_eq!(texture.header.pixel_format, Some(PixelFormat::Etc1));
    let mips = texture.mipmaps().unwrap();
    assert_eq!(mips.len(), 3);
    assert_eq!(mips[0].length, 32);
    assert_eq!(mips[2].offset + mips[2].length, 48);
}
