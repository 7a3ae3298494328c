use ash::vk;
use bitmask_enum::bitmask;

use crate::traits::Handle;
use crate::vk::Driver;

/// A queue retrieved from a logical device.
///
/// Queues are owned by their [`LogicalDevice`](crate::vk::LogicalDevice) and are never destroyed individually.
pub struct Queue<D : Driver> {
    handle : D::Queue,
    index : u32,
    family : QueueFamily,
}

#[bitmask(u8)]
pub enum QueueAffinity {
    Compute,
    Graphics,
    Transfer,
}

impl<D : Driver> Queue<D> {
    pub fn new(family : &QueueFamily, index : u32, device : &D::Device, driver : &D) -> Self {
        Self {
            index,
            family : *family,
            handle : driver.get_device_queue(device, family.index(), index),
        }
    }

    pub fn affinity(&self) -> QueueAffinity {
        let mut affinity = QueueAffinity::none();
        if self.family.is_compute() {
            affinity = affinity.or(QueueAffinity::Compute);
        }
        if self.family.is_graphics() {
            affinity = affinity.or(QueueAffinity::Graphics);
        }
        if self.family.is_transfer() {
            affinity = affinity.or(QueueAffinity::Transfer);
        }
        affinity
    }

    #[inline] pub fn index(&self) -> u32 { self.index }
    #[inline] pub fn family_index(&self) -> u32 { self.family.index() }
    #[inline] pub fn family(&self) -> &QueueFamily { &self.family }
}

impl<D : Driver> Handle for Queue<D> {
    type Target = D::Queue;

    fn handle(&self) -> D::Queue { self.handle }
}

/// A queue family.
///
/// This structure associates, for a particular physical device, a queue family's properties with its index.
#[derive(Clone, Copy, Debug)]
pub struct QueueFamily {
    /// The index of this queue family.
    index : u32,
    /// An object describing properties of this queue family.
    properties : vk::QueueFamilyProperties,
}

impl QueueFamily {
    pub fn new(index : u32, properties : vk::QueueFamilyProperties) -> Self {
        Self { index, properties }
    }

    #[inline] pub fn index(&self) -> u32 { self.index }

    /// Checks if this queue family supports graphics operations.
    #[inline] pub fn is_graphics(&self) -> bool { self.properties.queue_flags.contains(vk::QueueFlags::GRAPHICS) }

    /// Checks if this queue family supports compute operations.
    #[inline] pub fn is_compute(&self) -> bool { self.properties.queue_flags.contains(vk::QueueFlags::COMPUTE) }

    /// Checks if this queue family supports transfer operations.
    #[inline] pub fn is_transfer(&self) -> bool { self.properties.queue_flags.contains(vk::QueueFlags::TRANSFER) || self.is_compute() || self.is_graphics() }

    #[inline] pub fn count(&self) -> u32 { self.properties.queue_count }
}

/// Queue family indices resolved for each capability the bootstrap needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    pub graphics : Option<u32>,
}

impl QueueFamilyIndices {
    /// Scans `families` in order and records the first family providing each capability.
    /// The scan stops as soon as every capability is resolved.
    pub fn find(families : &[QueueFamily]) -> Self {
        let mut indices = Self::default();

        for family in families {
            if indices.graphics.is_none() && family.is_graphics() {
                indices.graphics = Some(family.index());
            }

            if indices.is_complete() {
                break;
            }
        }

        indices
    }

    /// Returns true if every required capability has a queue family.
    #[inline] pub fn is_complete(&self) -> bool { self.graphics.is_some() }
}
