//! glTF/GLB export.
//!
//! All pages share one geometry, so vertex attributes and the per-slot
//! index ranges are written once. Each page then gets its own six
//! materials, a skin with inverse bind matrices, and a node chain that
//! mirrors its bone chain in the current pose. A recorded clip becomes one
//! animation with a linear rotation channel per bone.

use crate::book::{AnimationClip, BookAssembly};
use crate::error::{CurlError, Result};
use crate::page::{PageMaterial, PageMaterialSet, PageMesh};
use glam::Quat;
use gltf_json as json;
use json::validation::Checked::Valid;
use json::validation::USize64;
use log::info;
use std::mem;

/// Export the book to GLB format (binary glTF) with embedded page images.
pub fn export_glb(book: &BookAssembly, clip: Option<&AnimationClip>) -> Result<Vec<u8>> {
    let pages = book.pages();
    if pages.is_empty() {
        return Err(CurlError::Export("Cannot export a book without pages".to_string()));
    }
    let geometry = pages[0].geometry();
    if geometry.is_empty() {
        return Err(CurlError::Export("Cannot export empty page geometry".to_string()));
    }
    let bone_count = book.dimensions().bone_count();
    if let Some(clip) = clip {
        if clip.page_count() != pages.len()
            || clip.rotations.iter().any(|tracks| tracks.len() != bone_count)
        {
            return Err(CurlError::Export(format!(
                "Clip covers {} pages, book has {} pages of {} bones",
                clip.page_count(),
                pages.len(),
                bone_count
            )));
        }
    }

    let mut builder = GlbBuilder::default();

    // Shared vertex attributes
    let vertex_count = geometry.vertex_count();
    let (min, max) = calculate_bounds(geometry);
    let pos_view = builder.push_view(
        bytemuck_cast_slice(&geometry.positions_flat()),
        Some(json::buffer::Target::ArrayBuffer),
    );
    let norm_view = builder.push_view(
        bytemuck_cast_slice(&geometry.normals_flat()),
        Some(json::buffer::Target::ArrayBuffer),
    );
    let uv_view = builder.push_view(
        bytemuck_cast_slice(&geometry.uvs_flat()),
        Some(json::buffer::Target::ArrayBuffer),
    );
    let joint_view = builder.push_view(
        bytemuck_cast_slice(&geometry.joints_flat()),
        Some(json::buffer::Target::ArrayBuffer),
    );
    let weight_view = builder.push_view(
        bytemuck_cast_slice(&geometry.weights_flat()),
        Some(json::buffer::Target::ArrayBuffer),
    );
    let idx_view = builder.push_view(
        bytemuck_cast_slice(&geometry.indices),
        Some(json::buffer::Target::ElementArrayBuffer),
    );

    let vec_accessor = |builder: &mut GlbBuilder, view, type_, component_type| {
        builder.push_accessor(view, 0, vertex_count, type_, component_type, None, None)
    };
    let attributes = VertexAccessors {
        positions: builder.push_accessor(
            pos_view,
            0,
            vertex_count,
            json::accessor::Type::Vec3,
            json::accessor::ComponentType::F32,
            Some(min.to_vec()),
            Some(max.to_vec()),
        ),
        normals: vec_accessor(
            &mut builder,
            norm_view,
            json::accessor::Type::Vec3,
            json::accessor::ComponentType::F32,
        ),
        uvs: vec_accessor(
            &mut builder,
            uv_view,
            json::accessor::Type::Vec2,
            json::accessor::ComponentType::F32,
        ),
        joints: vec_accessor(
            &mut builder,
            joint_view,
            json::accessor::Type::Vec4,
            json::accessor::ComponentType::U16,
        ),
        weights: vec_accessor(
            &mut builder,
            weight_view,
            json::accessor::Type::Vec4,
            json::accessor::ComponentType::F32,
        ),
    };

    // One index accessor per material slot, all in the same view
    let group_accessors: Vec<(usize, u32)> = geometry
        .groups
        .iter()
        .map(|group| {
            let accessor = builder.push_accessor(
                idx_view,
                group.start * mem::size_of::<u32>(),
                group.count,
                json::accessor::Type::Scalar,
                json::accessor::ComponentType::U32,
                None,
                None,
            );
            (group.slot.index(), accessor)
        })
        .collect();

    // Inverse bind matrices for every page, back to back
    let ibm_data: Vec<f32> = pages
        .iter()
        .flat_map(|page| {
            page.rig()
                .inverse_bind_matrices()
                .iter()
                .flat_map(|m| m.to_cols_array())
                .collect::<Vec<_>>()
        })
        .collect();
    let ibm_view = builder.push_view(bytemuck_cast_slice(&ibm_data), None);
    let ibm_stride = bone_count * 16 * mem::size_of::<f32>();

    let untextured = PageMaterialSet::untextured();
    let mut meshes = Vec::new();
    let mut skins = Vec::new();
    let mut nodes = vec![empty_node()];
    let mut page_nodes = Vec::new();
    let mut first_bone_nodes = Vec::new();

    for (p, page) in pages.iter().enumerate() {
        // Materials
        let material_base = builder.materials.len() as u32;
        let set = page.materials().unwrap_or(&untextured);
        for (_, material) in set.iter() {
            builder.push_material(material)?;
        }

        // Mesh: one primitive per slot
        let primitives = group_accessors
            .iter()
            .map(|(slot, indices)| create_primitive(&attributes, *indices, material_base + *slot as u32))
            .collect();
        meshes.push(json::Mesh {
            extensions: Default::default(),
            extras: Default::default(),
            primitives,
            weights: None,
        });

        // Skin
        let ibm_accessor = builder.push_accessor(
            ibm_view,
            p * ibm_stride,
            bone_count,
            json::accessor::Type::Mat4,
            json::accessor::ComponentType::F32,
            None,
            None,
        );
        let page_node = nodes.len() as u32;
        let mesh_node = page_node + 1;
        let first_bone = page_node + 2;
        skins.push(json::Skin {
            extensions: Default::default(),
            extras: Default::default(),
            inverse_bind_matrices: Some(json::Index::new(ibm_accessor)),
            joints: (0..bone_count as u32).map(|i| json::Index::new(first_bone + i)).collect(),
            skeleton: Some(json::Index::new(first_bone)),
        });

        // Nodes: page, mesh, then the bone chain
        let mut page_node_def = empty_node();
        page_node_def.translation = Some([0.0, 0.0, page.depth_offset()]);
        page_node_def.children = Some(vec![json::Index::new(mesh_node), json::Index::new(first_bone)]);
        nodes.push(page_node_def);

        let mut mesh_node_def = empty_node();
        mesh_node_def.mesh = Some(json::Index::new(p as u32));
        mesh_node_def.skin = Some(json::Index::new(p as u32));
        nodes.push(mesh_node_def);

        for (i, bone) in page.rig().bones().iter().enumerate() {
            let mut bone_node = empty_node();
            bone_node.translation = Some(bone.local_position.to_array());
            let rotation = Quat::from_rotation_y(bone.rotation).to_array();
            bone_node.rotation = Some(json::scene::UnitQuaternion(rotation));
            if i + 1 < bone_count {
                bone_node.children = Some(vec![json::Index::new(first_bone + i as u32 + 1)]);
            }
            nodes.push(bone_node);
        }

        page_nodes.push(json::Index::new(page_node));
        first_bone_nodes.push(first_bone);
    }
    nodes[0].children = Some(page_nodes);

    // Animation
    let mut animations = Vec::new();
    if let Some(clip) = clip {
        let times_view = builder.push_view(bytemuck_cast_slice(&clip.times), None);
        let times_accessor = builder.push_accessor(
            times_view,
            0,
            clip.frame_count(),
            json::accessor::Type::Scalar,
            json::accessor::ComponentType::F32,
            Some(vec![clip.times.first().copied().unwrap_or(0.0)]),
            Some(vec![clip.duration()]),
        );

        let mut output_data: Vec<f32> = Vec::new();
        let mut output_offsets = Vec::new();
        for tracks in &clip.rotations {
            for track in tracks {
                output_offsets.push(output_data.len() * mem::size_of::<f32>());
                output_data.extend(track.iter().flat_map(|angle| Quat::from_rotation_y(*angle).to_array()));
            }
        }
        let output_view = builder.push_view(bytemuck_cast_slice(&output_data), None);

        let mut samplers = Vec::new();
        let mut channels = Vec::new();
        for (p, first_bone) in first_bone_nodes.iter().enumerate() {
            for b in 0..bone_count {
                let offset = output_offsets[p * bone_count + b];
                let output = builder.push_accessor(
                    output_view,
                    offset,
                    clip.frame_count(),
                    json::accessor::Type::Vec4,
                    json::accessor::ComponentType::F32,
                    None,
                    None,
                );
                let sampler_idx = samplers.len() as u32;
                samplers.push(json::animation::Sampler {
                    extensions: Default::default(),
                    extras: Default::default(),
                    input: json::Index::new(times_accessor),
                    interpolation: Valid(json::animation::Interpolation::Linear),
                    output: json::Index::new(output),
                });
                channels.push(json::animation::Channel {
                    sampler: json::Index::new(sampler_idx),
                    target: json::animation::Target {
                        extensions: Default::default(),
                        extras: Default::default(),
                        node: json::Index::new(first_bone + b as u32),
                        path: Valid(json::animation::Property::Rotation),
                    },
                    extensions: Default::default(),
                    extras: Default::default(),
                });
            }
        }

        animations.push(json::Animation {
            extensions: Default::default(),
            extras: Default::default(),
            channels,
            samplers,
        });
    }

    let total_buffer_size = builder.buffer.len();
    let GlbBuilder {
        buffer: buffer_data,
        buffer_views,
        accessors,
        images,
        textures,
        materials,
    } = builder;

    // Build glTF JSON
    let root = json::Root {
        accessors,
        animations,
        buffers: vec![json::Buffer {
            byte_length: USize64(total_buffer_size as u64),
            extensions: Default::default(),
            extras: Default::default(),
            uri: None,
        }],
        buffer_views,
        images,
        samplers: vec![json::texture::Sampler {
            mag_filter: Some(Valid(json::texture::MagFilter::Linear)),
            min_filter: Some(Valid(json::texture::MinFilter::Linear)),
            wrap_s: Valid(json::texture::WrappingMode::ClampToEdge),
            wrap_t: Valid(json::texture::WrappingMode::ClampToEdge),
            extensions: Default::default(),
            extras: Default::default(),
        }],
        textures,
        materials,
        meshes,
        nodes,
        skins,
        scenes: vec![json::Scene {
            extensions: Default::default(),
            extras: Default::default(),
            nodes: vec![json::Index::new(0)],
        }],
        scene: Some(json::Index::new(0)),
        ..Default::default()
    };

    let glb = write_glb(&root, &buffer_data)?;
    info!("exported {} pages to GLB ({} bytes)", pages.len(), glb.len());
    Ok(glb)
}

/// Accessor indices of the shared vertex attributes.
struct VertexAccessors {
    positions: u32,
    normals: u32,
    uvs: u32,
    joints: u32,
    weights: u32,
}

/// Binary buffer plus the glTF arrays that index into it.
#[derive(Default)]
struct GlbBuilder {
    buffer: Vec<u8>,
    buffer_views: Vec<json::buffer::View>,
    accessors: Vec<json::Accessor>,
    images: Vec<json::Image>,
    textures: Vec<json::Texture>,
    materials: Vec<json::Material>,
}

impl GlbBuilder {
    /// Append bytes (aligned to 4 bytes) as a new buffer view.
    fn push_view(&mut self, bytes: &[u8], target: Option<json::buffer::Target>) -> u32 {
        let padding = (4 - (self.buffer.len() % 4)) % 4;
        self.buffer.extend(std::iter::repeat(0u8).take(padding));
        let offset = self.buffer.len();
        self.buffer.extend_from_slice(bytes);
        self.buffer_views.push(create_buffer_view(offset, bytes.len(), target));
        (self.buffer_views.len() - 1) as u32
    }

    #[allow(clippy::too_many_arguments)]
    fn push_accessor(
        &mut self,
        buffer_view: u32,
        byte_offset: usize,
        count: usize,
        type_: json::accessor::Type,
        component_type: json::accessor::ComponentType,
        min: Option<Vec<f32>>,
        max: Option<Vec<f32>>,
    ) -> u32 {
        self.accessors.push(create_accessor(
            buffer_view,
            byte_offset,
            count,
            type_,
            component_type,
            min,
            max,
        ));
        (self.accessors.len() - 1) as u32
    }

    /// Add a material, embedding its texture as PNG when it has one.
    fn push_material(&mut self, material: &PageMaterial) -> Result<u32> {
        let texture_idx = match &material.texture {
            Some(texture) => {
                let png = texture.to_png()?;
                let view = self.push_view(&png, None);
                let image_idx = self.images.len() as u32;
                self.images.push(json::Image {
                    buffer_view: Some(json::Index::new(view)),
                    mime_type: Some(json::image::MimeType("image/png".to_string())),
                    uri: None,
                    extensions: Default::default(),
                    extras: Default::default(),
                });
                let texture_idx = self.textures.len() as u32;
                self.textures.push(json::Texture {
                    sampler: Some(json::Index::new(0)),
                    source: json::Index::new(image_idx),
                    extensions: Default::default(),
                    extras: Default::default(),
                });
                Some(texture_idx)
            }
            None => None,
        };
        self.materials.push(create_material(material, texture_idx));
        Ok((self.materials.len() - 1) as u32)
    }
}

/// Serialize the JSON root and binary buffer into a GLB container.
fn write_glb(root: &json::Root, buffer_data: &[u8]) -> Result<Vec<u8>> {
    let json_string = json::serialize::to_string(root)
        .map_err(|e| CurlError::Export(format!("Failed to serialize glTF JSON: {}", e)))?;
    let json_bytes = json_string.as_bytes();

    // Pad JSON to 4-byte alignment
    let json_padding = (4 - (json_bytes.len() % 4)) % 4;
    let padded_json_len = json_bytes.len() + json_padding;

    // Pad buffer to 4-byte alignment
    let buffer_padding = (4 - (buffer_data.len() % 4)) % 4;
    let padded_buffer_len = buffer_data.len() + buffer_padding;

    // Calculate total size
    let total_size = 12 + // GLB header
        8 + padded_json_len + // JSON chunk
        8 + padded_buffer_len; // BIN chunk

    let mut glb = Vec::with_capacity(total_size);

    // GLB Header
    glb.extend_from_slice(b"glTF"); // magic
    glb.extend_from_slice(&2u32.to_le_bytes()); // version
    glb.extend_from_slice(&(total_size as u32).to_le_bytes()); // length

    // JSON Chunk
    glb.extend_from_slice(&(padded_json_len as u32).to_le_bytes()); // chunk length
    glb.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // chunk type: JSON
    glb.extend_from_slice(json_bytes);
    glb.extend_from_slice(&vec![0x20u8; json_padding]); // padding (spaces)

    // BIN Chunk
    glb.extend_from_slice(&(padded_buffer_len as u32).to_le_bytes()); // chunk length
    glb.extend_from_slice(&0x004E4942u32.to_le_bytes()); // chunk type: BIN
    glb.extend_from_slice(buffer_data);
    glb.extend_from_slice(&vec![0u8; buffer_padding]); // padding (zeros)

    Ok(glb)
}

/// Bind-pose bounds of the page geometry.
fn calculate_bounds(mesh: &PageMesh) -> ([f32; 3], [f32; 3]) {
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];

    for vertex in &mesh.vertices {
        for i in 0..3 {
            min[i] = min[i].min(vertex.position[i]);
            max[i] = max[i].max(vertex.position[i]);
        }
    }

    // Handle empty case
    if min[0] == f32::MAX {
        min = [0.0; 3];
        max = [0.0; 3];
    }

    (min, max)
}

fn empty_node() -> json::Node {
    json::Node {
        camera: None,
        children: None,
        extensions: Default::default(),
        extras: Default::default(),
        matrix: None,
        mesh: None,
        rotation: None,
        scale: None,
        translation: None,
        skin: None,
        weights: None,
    }
}

/// Create a buffer view.
fn create_buffer_view(
    offset: usize,
    size: usize,
    target: Option<json::buffer::Target>,
) -> json::buffer::View {
    json::buffer::View {
        buffer: json::Index::new(0),
        byte_length: USize64(size as u64),
        byte_offset: Some(USize64(offset as u64)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        target: target.map(Valid),
    }
}

/// Create an accessor.
fn create_accessor(
    buffer_view: u32,
    byte_offset: usize,
    count: usize,
    type_: json::accessor::Type,
    component_type: json::accessor::ComponentType,
    min: Option<Vec<f32>>,
    max: Option<Vec<f32>>,
) -> json::Accessor {
    json::Accessor {
        buffer_view: Some(json::Index::new(buffer_view)),
        byte_offset: Some(USize64(byte_offset as u64)),
        count: USize64(count as u64),
        component_type: Valid(json::accessor::GenericComponentType(component_type)),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(type_),
        min: min.map(json::Value::from),
        max: max.map(json::Value::from),
        normalized: false,
        sparse: None,
    }
}

/// Create a skinned primitive.
fn create_primitive(
    attributes: &VertexAccessors,
    indices_accessor: u32,
    material: u32,
) -> json::mesh::Primitive {
    let mut map = std::collections::BTreeMap::new();
    map.insert(Valid(json::mesh::Semantic::Positions), json::Index::new(attributes.positions));
    map.insert(Valid(json::mesh::Semantic::Normals), json::Index::new(attributes.normals));
    map.insert(Valid(json::mesh::Semantic::TexCoords(0)), json::Index::new(attributes.uvs));
    map.insert(Valid(json::mesh::Semantic::Joints(0)), json::Index::new(attributes.joints));
    map.insert(Valid(json::mesh::Semantic::Weights(0)), json::Index::new(attributes.weights));

    json::mesh::Primitive {
        attributes: map,
        extensions: Default::default(),
        extras: Default::default(),
        indices: Some(json::Index::new(indices_accessor)),
        material: Some(json::Index::new(material)),
        mode: Valid(json::mesh::Mode::Triangles),
        targets: None,
    }
}

/// Create a material from a page material and optional texture index.
fn create_material(material: &PageMaterial, texture_idx: Option<u32>) -> json::Material {
    // Die-cut or translucent page images blend; everything else stays opaque.
    let alpha_mode = match &material.texture {
        Some(texture) if texture.has_transparency() => json::material::AlphaMode::Blend,
        _ => json::material::AlphaMode::Opaque,
    };

    json::Material {
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_texture: texture_idx.map(|index| json::texture::Info {
                index: json::Index::new(index),
                tex_coord: 0,
                extensions: Default::default(),
                extras: Default::default(),
            }),
            base_color_factor: json::material::PbrBaseColorFactor(material.color),
            metallic_factor: json::material::StrengthFactor(0.0),
            roughness_factor: json::material::StrengthFactor(material.roughness),
            metallic_roughness_texture: None,
            extensions: Default::default(),
            extras: Default::default(),
        },
        alpha_mode: Valid(alpha_mode),
        alpha_cutoff: None,
        double_sided: false,
        normal_texture: None,
        occlusion_texture: None,
        emissive_texture: None,
        emissive_factor: json::material::EmissiveFactor([0.0, 0.0, 0.0]),
        extensions: Default::default(),
        extras: Default::default(),
    }
}

/// Cast a slice of T to a slice of bytes.
fn bytemuck_cast_slice<T: Copy>(slice: &[T]) -> &[u8] {
    let ptr = slice.as_ptr() as *const u8;
    let len = std::mem::size_of_val(slice);
    // SAFETY: only called with f32/u16/u32 slices, which have no padding.
    unsafe { std::slice::from_raw_parts(ptr, len) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::{Book, ClipRecorder, Command};
    use crate::config::{BookConfig, PageDimensions, PageSpec};
    use crate::page::{MemorySource, TextureData, TextureLoader};
    use std::sync::Arc;

    fn book(pages: usize, source: MemorySource) -> Book {
        let specs = (0..pages).map(|i| PageSpec::new(format!("{}f.png", i), format!("{}b.png", i))).collect();
        let config = BookConfig::new("export", specs).with_page_dimensions(PageDimensions {
            segments: 6,
            ..Default::default()
        });
        let mut book = Book::new(&config, &TextureLoader::inline(Arc::new(source))).unwrap();
        book.wait_for_textures();
        book.frame(std::time::Duration::from_millis(16));
        book
    }

    /// Split a GLB into its parsed JSON chunk and binary chunk length.
    fn parse_glb(glb: &[u8]) -> (serde_json::Value, usize) {
        assert_eq!(&glb[0..4], b"glTF");
        assert_eq!(u32::from_le_bytes([glb[4], glb[5], glb[6], glb[7]]), 2);
        assert_eq!(u32::from_le_bytes([glb[8], glb[9], glb[10], glb[11]]) as usize, glb.len());

        let json_len = u32::from_le_bytes([glb[12], glb[13], glb[14], glb[15]]) as usize;
        let json: serde_json::Value = serde_json::from_slice(&glb[20..20 + json_len]).unwrap();
        let bin_start = 20 + json_len;
        let bin_len = u32::from_le_bytes([glb[bin_start], glb[bin_start + 1], glb[bin_start + 2], glb[bin_start + 3]]) as usize;
        (json, bin_len)
    }

    #[test]
    fn test_export_structure() {
        let b = book(3, MemorySource::new());
        let glb = export_glb(b.assembly(), None).unwrap();
        let (json, bin_len) = parse_glb(&glb);

        assert_eq!(json["meshes"].as_array().unwrap().len(), 3);
        assert_eq!(json["skins"].as_array().unwrap().len(), 3);
        assert_eq!(json["materials"].as_array().unwrap().len(), 18);
        // Root, then per page: page node, mesh node and seven bones.
        assert_eq!(json["nodes"].as_array().unwrap().len(), 1 + 3 * 9);
        assert_eq!(json["skins"][0]["joints"].as_array().unwrap().len(), 7);
        assert_eq!(json["meshes"][0]["primitives"].as_array().unwrap().len(), 6);
        assert!(json.get("animations").is_none());
        assert_eq!(bin_len % 4, 0);
        assert!(bin_len > 0);
    }

    #[test]
    fn test_export_embeds_loaded_images() {
        let png = TextureData::solid(2, 2, [40, 50, 60, 255]).to_png().unwrap();
        let source = MemorySource::new()
            .with_image("0f.png", png.clone())
            .with_image("0b.png", png);
        let b = book(2, source);
        let glb = export_glb(b.assembly(), None).unwrap();
        let (json, _) = parse_glb(&glb);

        // Only page 0 resolved its images; page 1 falls back to colour.
        assert_eq!(json["images"].as_array().unwrap().len(), 2);
        assert_eq!(json["textures"].as_array().unwrap().len(), 2);
        assert!(json["materials"][4]["pbrMetallicRoughness"].get("baseColorTexture").is_some());
        assert!(json["materials"][10]["pbrMetallicRoughness"].get("baseColorTexture").is_none());
    }

    #[test]
    fn test_transparent_images_blend() {
        let clear = TextureData::solid(2, 2, [40, 50, 60, 128]).to_png().unwrap();
        let solid = TextureData::solid(2, 2, [40, 50, 60, 255]).to_png().unwrap();
        let source = MemorySource::new()
            .with_image("0f.png", clear)
            .with_image("0b.png", solid);
        let b = book(1, source);
        let glb = export_glb(b.assembly(), None).unwrap();
        let (json, _) = parse_glb(&glb);

        assert_eq!(json["materials"][4]["alphaMode"], "BLEND");
        assert_ne!(json["materials"][5]["alphaMode"], "BLEND");
        assert_ne!(json["materials"][0]["alphaMode"], "BLEND");
    }

    #[test]
    fn test_export_with_clip() {
        let mut b = book(2, MemorySource::new());
        let clip = ClipRecorder::new(10.0).record(&mut b, &[Command::Open]);
        let glb = export_glb(b.assembly(), Some(&clip)).unwrap();
        let (json, _) = parse_glb(&glb);

        let animation = &json["animations"][0];
        assert_eq!(animation["channels"].as_array().unwrap().len(), 2 * 7);
        assert_eq!(animation["samplers"].as_array().unwrap().len(), 2 * 7);
        assert_eq!(animation["channels"][0]["target"]["path"], "rotation");

        let input = animation["samplers"][0]["input"].as_u64().unwrap() as usize;
        assert_eq!(json["accessors"][input]["count"].as_u64().unwrap() as usize, clip.frame_count());
    }

    #[test]
    fn test_export_rejects_mismatched_clip() {
        let mut two = book(2, MemorySource::new());
        let clip = ClipRecorder::new(10.0).record(&mut two, &[]);
        let three = book(3, MemorySource::new());
        assert!(matches!(export_glb(three.assembly(), Some(&clip)), Err(CurlError::Export(_))));
    }
}
