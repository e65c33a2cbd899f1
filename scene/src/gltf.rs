use std::{collections::HashMap, fs::File, io::BufReader, ops::Range, path::Path};

use gltf::{image, mesh, texture};

use crate::{
    Error, ImportOptions, Instance, Material, MaterialTexture, Mesh, Result, Scene, TextureKind,
    Vertex, io::FileLoader, process, registry::TextureRegistry,
};

pub struct Gltf;

impl FileLoader for Gltf {
    const SUPPORTED_EXTENSIONS: &'static [&'static str] = &["gltf", "glb"];

    fn load(filename: impl AsRef<Path>, options: &ImportOptions) -> Result<Scene> {
        firestorm::profile_method!(load);

        let filename = filename.as_ref();
        let filedir = filename.parent().unwrap_or_else(|| Path::new("./"));

        let gltf::Gltf { document, blob } = {
            let file = File::open(filename).map_err(Error::io(filename))?;
            gltf::Gltf::from_reader(BufReader::new(file))?
        };
        let buffers = gltf::import_buffers(&document, Some(filedir), blob)?;

        let default_scene = document
            .default_scene()
            .or_else(|| document.scenes().next())
            .ok_or_else(|| Error::IncompleteScene(String::from("no scenes found")))?;

        let mut importer = Importer {
            directory: filedir,
            buffers: &buffers,
            options,
            scene: Scene {
                directory: filedir.to_owned(),
                ..Default::default()
            },
            registry: TextureRegistry::default(),
            processed_materials: HashMap::new(),
            processed_meshes: HashMap::new(),
        };

        default_scene
            .nodes()
            .traverse_meshes(glam::Mat4::IDENTITY, &mut |mesh, transform| {
                importer.add_instances(mesh, transform)
            })?;

        let Importer {
            mut scene,
            registry,
            ..
        } = importer;
        scene.textures = registry.into_textures();
        scene.update_bounding_box();
        scene.validate()?;

        log::info!(
            "Loaded {}: {} meshes, {} instances, {} materials, {} textures",
            filename.display(),
            scene.meshes.len(),
            scene.instances.len(),
            scene.materials.len(),
            scene.textures.len(),
        );
        Ok(scene)
    }
}

struct Importer<'a> {
    directory: &'a Path,
    buffers: &'a [gltf::buffer::Data],
    options: &'a ImportOptions,
    scene: Scene,
    registry: TextureRegistry,
    // json material index (None for the gltf default material) -> scene material index
    processed_materials: HashMap<Option<usize>, usize>,
    // json mesh index -> loaded meshes range
    processed_meshes: HashMap<usize, Range<usize>>,
}

impl Importer<'_> {
    fn add_instances(&mut self, mesh: &mesh::Mesh<'_>, transform: glam::Mat4) -> Result<()> {
        let meshes = self.handle_mesh(mesh)?;
        self.scene
            .instances
            .extend(meshes.map(|mesh| Instance { mesh, transform }));
        Ok(())
    }

    fn handle_mesh(&mut self, mesh: &mesh::Mesh<'_>) -> Result<Range<usize>> {
        if let Some(range) = self.processed_meshes.get(&mesh.index()) {
            return Ok(range.clone());
        }

        let name = mesh
            .name()
            .map_or_else(|| format!("mesh{}", mesh.index()), str::to_owned);
        let meshes_start = self.scene.meshes.len();
        for primitive in mesh.primitives() {
            let primitive_name = if mesh.primitives().len() > 1 {
                format!("{name}#{}", primitive.index())
            } else {
                name.clone()
            };
            let loaded = self.load_primitive(&primitive, primitive_name)?;
            self.scene.meshes.push(loaded);
        }
        let range = meshes_start..self.scene.meshes.len();

        self.processed_meshes.insert(mesh.index(), range.clone());
        Ok(range)
    }

    fn load_primitive(&mut self, primitive: &mesh::Primitive<'_>, name: String) -> Result<Mesh> {
        firestorm::profile_method!(load_primitive);

        let invalid = |reason: &str| Error::InvalidPrimitive {
            mesh: name.clone(),
            primitive: primitive.index(),
            reason: reason.to_owned(),
        };

        let buffers = self.buffers;
        let reader =
            primitive.reader(move |buffer| buffers.get(buffer.index()).map(|data| &data[..]));

        let positions = reader
            .read_positions()
            .ok_or_else(|| invalid("no positions found"))?;
        let normals = reader.read_normals().map_or_else(
            || Box::new(std::iter::repeat_with(Default::default)) as Box<_>,
            |nn| Box::new(nn) as Box<dyn Iterator<Item = [f32; 3]>>,
        );
        let tex_coords = reader
            .read_tex_coords(0)
            .map(mesh::util::ReadTexCoords::into_f32)
            .map_or_else(
                || Box::new(std::iter::repeat_with(Default::default)) as Box<_>,
                |uv| Box::new(uv) as Box<dyn Iterator<Item = [f32; 2]>>,
            );

        let vertices = positions
            .zip(normals)
            .zip(tex_coords)
            .map(Vertex::from)
            .collect::<Vec<_>>();

        let indices = reader.read_indices().map_or_else(
            || (0..vertices.len() as u32).collect(),
            |indices| indices.into_u32().collect::<Vec<_>>(),
        );

        let indices = match (primitive.mode(), self.options.triangulate) {
            (mesh::Mode::Triangles, _) => indices,
            (mesh::Mode::TriangleStrip, true) => process::triangulate_strip(&indices),
            (mesh::Mode::TriangleFan, true) => process::triangulate_fan(&indices),
            (mode, _) => return Err(invalid(&format!("unsupported primitive mode {mode:?}"))),
        };

        let mut loaded = Mesh::new(name, vertices, indices);
        process::apply(&mut loaded, self.options, false);
        loaded.material = Some(self.handle_material(&primitive.material()));

        log::debug!(
            "Primitive {}: {} vertices, {} triangles",
            loaded.name,
            loaded.vertices.len(),
            loaded.triangle_count()
        );
        Ok(loaded)
    }

    fn handle_material(&mut self, material: &gltf::Material<'_>) -> usize {
        if let Some(&index) = self.processed_materials.get(&material.index()) {
            return index;
        }

        let pbr = material.pbr_metallic_roughness();
        let mut textures = Vec::new();
        let mut add_texture = |kind, texture: Option<texture::Texture<'_>>| {
            if let Some(texture) = texture.and_then(|tex| self.handle_texture(&tex)) {
                textures.push(MaterialTexture { kind, texture });
            }
        };
        add_texture(
            TextureKind::Diffuse,
            pbr.base_color_texture().map(|info| info.texture()),
        );
        add_texture(
            TextureKind::Specular,
            pbr.metallic_roughness_texture().map(|info| info.texture()),
        );
        add_texture(
            TextureKind::Normal,
            material.normal_texture().map(|info| info.texture()),
        );
        add_texture(
            TextureKind::Height,
            material.occlusion_texture().map(|info| info.texture()),
        );

        let index = self.scene.materials.len();
        let roughness = pbr.roughness_factor();
        self.scene.materials.push(Material {
            name: material
                .name()
                .map_or_else(|| format!("material{index}"), str::to_owned),
            textures,
            diffuse_color: glam::Vec4::from(pbr.base_color_factor()).truncate(),
            specular_color: glam::Vec3::splat(1. - roughness),
            shininess: shininess_from_roughness(roughness),
        });

        self.processed_materials.insert(material.index(), index);
        index
    }

    fn handle_texture(&mut self, texture: &texture::Texture<'_>) -> Option<usize> {
        let image = texture.source();
        match image.source() {
            image::Source::Uri { uri, .. } if !uri.starts_with("data:") => {
                // relative URIs are percent-encoded, file names are not
                let path = urlencoding::decode(uri).unwrap_or_else(|err| {
                    log::warn!("Using undecoded image URI {uri}: {err}");
                    uri.into()
                });
                Some(self.registry.resolve(self.directory, &*path))
            }
            _ => {
                log::warn!(
                    "Skipping embedded image #{}: only external image files are supported",
                    image.index()
                );
                None
            }
        }
    }
}

/// Blinn-Phong exponent roughly equivalent to a GGX roughness.
fn shininess_from_roughness(roughness: f32) -> f32 {
    (2. / roughness.powi(4).max(1e-4) - 2.).clamp(1., 256.)
}

trait Traversable {
    fn traverse_meshes(
        self,
        transform: glam::Mat4,
        f: &mut impl FnMut(&mesh::Mesh<'_>, glam::Mat4) -> Result<()>,
    ) -> Result<()>;
}

impl Traversable for gltf::scene::Node<'_> {
    fn traverse_meshes(
        self,
        transform: glam::Mat4,
        f: &mut impl FnMut(&mesh::Mesh<'_>, glam::Mat4) -> Result<()>,
    ) -> Result<()> {
        let global_transform =
            transform * glam::Mat4::from_cols_array_2d(&self.transform().matrix());
        if let Some(mesh) = self.mesh() {
            f(&mesh, global_transform)?;
        }
        self.children().traverse_meshes(global_transform, f)
    }
}

macro_rules! impl_traversable {
    ($t:ty) => {
        impl Traversable for $t {
            fn traverse_meshes(
                self,
                transform: glam::Mat4,
                f: &mut impl FnMut(&mesh::Mesh<'_>, glam::Mat4) -> Result<()>,
            ) -> Result<()> {
                self.into_iter()
                    .try_for_each(|elem| elem.traverse_meshes(transform, f))
            }
        }
    };
}
impl_traversable!(gltf::scene::iter::Nodes<'_>);
impl_traversable!(gltf::scene::iter::Children<'_>);
