use winit::dpi::PhysicalSize;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl Size<u32> {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl<T> From<PhysicalSize<T>> for Size<T> {
    fn from(physical_size: PhysicalSize<T>) -> Self {
        Size {
            width: physical_size.width,
            height: physical_size.height,
        }
    }
}

impl<T> From<(T, T)> for Size<T> {
    fn from(value: (T, T)) -> Self {
        Size {
            width: value.0,
            height: value.1,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn aspect_ratio_survives_zero_height() {
        let minimized: Size<u32> = (800, 0).into();

        assert!(minimized.is_empty());
        assert_relative_eq!(minimized.aspect_ratio(), 800.0);
        assert_relative_eq!(Size::from((800u32, 600u32)).aspect_ratio(), 4.0 / 3.0);
    }
}
