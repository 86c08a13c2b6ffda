//! # 多实例控制器集合
//!
//! [`Fleet`] 按实例号顺序持有一组控制器。配置和事务都是逐个串行执行，
//! 不做流水。

use crate::compat::Vec;
use crate::drivers::traits::Controller;

/// 按实例号排列的控制器集合
pub struct Fleet<C: Controller> {
    controllers: Vec<C>,
}

impl<C: Controller> Fleet<C> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            controllers: Vec::with_capacity(capacity),
        }
    }

    /// 追加一个控制器，实例号必须紧接在已有的之后
    pub(crate) fn push(&mut self, controller: C) {
        debug_assert_eq!(controller.instance().index(), self.controllers.len());
        self.controllers.push(controller);
    }

    pub fn get(&self, index: usize) -> Option<&C> {
        self.controllers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut C> {
        self.controllers.get_mut(index)
    }

    pub fn iter(&self) -> core::slice::Iter<'_, C> {
        self.controllers.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, C> {
        self.controllers.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// 拆成单个控制器
    pub fn into_inner(self) -> Vec<C> {
        self.controllers
    }
}

impl<'f, C: Controller> IntoIterator for &'f mut Fleet<C> {
    type Item = &'f mut C;
    type IntoIter = core::slice::IterMut<'f, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<'f, C: Controller> IntoIterator for &'f Fleet<C> {
    type Item = &'f C;
    type IntoIter = core::slice::Iter<'f, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
