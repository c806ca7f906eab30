use wgpu::BindGroupEntry;

impl crate::Buffer {
    /// Create a uniform buffer binding.
    ///
    /// Example WGSL syntax:
    /// ```wgsl,ignore
    /// struct Params {
    ///     threshold: f32,
    /// }
    /// @group(0) @binding(2) var<uniform> params: Params;
    /// ```
    #[must_use]
    pub fn bind_uniform(&self) -> Binding {
        Binding {
            visibility: Binding::DEFAULT_VISIBILITY,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            resource: self.as_entire_binding(),
        }
    }
}

impl<D> crate::Texture<D>
where
    D: crate::TextureDimensions,
{
    /// Create a textureview binding.
    /// Color formats are bound as filterable floats.
    pub fn bind_texture(&self) -> Binding {
        self.view.bind()
    }

    /// Alias for `bind_texture()`.
    pub fn bind(&self) -> Binding {
        self.bind_texture()
    }
}

impl crate::Sampler {
    /// Create a filtering sampler binding.
    pub fn bind(&self) -> Binding {
        Binding {
            visibility: Binding::DEFAULT_VISIBILITY,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            resource: wgpu::BindingResource::Sampler(&self.inner),
        }
    }
}

/// Bindings for texture views that were not created through `Texture`,
/// such as a frame handed over by the caller.
pub trait ViewBindingExt {
    /// Binds the view as a filterable 2D float texture.
    fn bind(&self) -> Binding<'_>;
}

impl ViewBindingExt for wgpu::TextureView {
    fn bind(&self) -> Binding<'_> {
        Binding {
            visibility: Binding::DEFAULT_VISIBILITY,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            resource: wgpu::BindingResource::TextureView(self),
        }
    }
}

macro_rules! gen_binding_vis_fn {
    ($($fn_name:ident => $stage:ident),*) => {
        $(
            pub const fn $fn_name(mut self) -> Self {
                self.visibility = ::wgpu::ShaderStages::$stage;
                self
            }
        )*
    };
}

#[derive(Clone, Debug)]
pub struct Binding<'a> {
    pub visibility: wgpu::ShaderStages,
    pub ty: wgpu::BindingType,
    pub resource: wgpu::BindingResource<'a>,
}
impl Binding<'_> {
    pub(crate) const DEFAULT_VISIBILITY: wgpu::ShaderStages = wgpu::ShaderStages::VERTEX_FRAGMENT;

    gen_binding_vis_fn!(
        in_fragment => FRAGMENT
    );

    fn layout_entry(&self, index: usize) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding: index as _,
            visibility: self.visibility,
            ty: self.ty,
            count: None,
        }
    }
}

/// A bind group together with the layout it was created from.
/// Binding `i` of the slice passed at creation is `@binding(i)` in the shader.
#[derive(Debug)]
pub struct BindGroup {
    pub layout: wgpu::BindGroupLayout,
    pub inner: wgpu::BindGroup,
    label: String,
}
crate::wgpu_inner_deref!(BindGroup, wgpu::BindGroup);

impl BindGroup {
    pub fn new(device: &wgpu::Device, label: &str, bindings: &[Binding]) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: bindings
                .iter()
                .enumerate()
                .map(|(i, binding)| binding.layout_entry(i))
                .collect::<Vec<_>>()
                .as_slice(),
        });
        let inner = Self::create_group(device, label, &layout, bindings);

        BindGroup {
            layout,
            inner,
            label: label.to_string(),
        }
    }

    /// Replaces the bound resources while keeping the layout, so pipelines
    /// created against this group stay compatible.
    /// The bindings must have the same types, in the same order, as at creation.
    pub fn rebind(&mut self, device: &wgpu::Device, bindings: &[Binding]) {
        self.inner = Self::create_group(device, &self.label, &self.layout, bindings);
    }

    fn create_group(
        device: &wgpu::Device,
        label: &str,
        layout: &wgpu::BindGroupLayout,
        bindings: &[Binding],
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: bindings
                .iter()
                .enumerate()
                .map(|(i, b)| BindGroupEntry {
                    binding: i as _,
                    resource: b.resource.clone(),
                })
                .collect::<Vec<_>>()
                .as_slice(),
        })
    }
}
