//! Attribute filters
//!
//! Filters never delete nodes; they clear the `active` flag of nodes whose
//! attribute falls outside a closed interval, and reconstruction decides
//! how the deactivated regions are repainted. [`ComponentTree::restore`]
//! undoes every filter, including level rewrites.

use comptree_core::Pixel;

use crate::tree::ComponentTree;

impl<T: Pixel> ComponentTree<T> {
    /// Deactivate every node.
    pub fn set_false(&mut self) {
        for node in &mut self.nodes {
            node.active = false;
        }
    }

    /// Reactivate every node and reset levels to their construction
    /// values.
    pub fn restore(&mut self) {
        for node in &mut self.nodes {
            node.active = true;
            node.h = node.ori_h;
        }
    }

    /// Deactivate nodes whose area lies outside `[lo, hi]`.
    pub fn area_filtering(&mut self, lo: i64, hi: i64) {
        for node in &mut self.nodes {
            if node.area < lo || node.area > hi {
                node.active = false;
            }
        }
    }

    /// Deactivate nodes whose volume lies outside `[lo, hi]`.
    pub fn volumic_filtering(&mut self, lo: i64, hi: i64) {
        for node in &mut self.nodes {
            if node.volume < lo || node.volume > hi {
                node.active = false;
            }
        }
    }

    /// Deactivate nodes whose contrast lies outside `[lo, hi]`.
    pub fn contrast_filtering(&mut self, lo: i64, hi: i64) {
        for node in &mut self.nodes {
            if node.contrast < lo || node.contrast > hi {
                node.active = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use comptree_core::Image;

    use crate::tree::ComponentTree;

    fn step_row() -> Image<u8> {
        Image::from_vec_2d(4, 1, vec![1, 1, 2, 3]).expect("valid fixture")
    }

    #[test]
    fn test_set_false_and_restore() {
        let mut tree = ComponentTree::new(&step_row()).unwrap();
        tree.set_false();
        assert!(tree.bfs().iter().all(|&n| !tree.node(n).active));
        tree.restore();
        assert!(tree.bfs().iter().all(|&n| tree.node(n).active));
    }

    #[test]
    fn test_area_filtering_bounds_are_inclusive() {
        let mut tree = ComponentTree::new(&step_row()).unwrap();
        // areas are 4, 2, 1
        tree.area_filtering(1, 2);
        let active: Vec<i64> = tree
            .bfs()
            .into_iter()
            .filter(|&n| tree.node(n).active)
            .map(|n| tree.node(n).area)
            .collect();
        assert_eq!(active, vec![2, 1]);
    }

    #[test]
    fn test_contrast_filtering() {
        let mut tree = ComponentTree::new(&step_row()).unwrap();
        // contrasts are 2, 1, 0: drop the root only
        tree.contrast_filtering(0, 1);
        assert!(!tree.node(tree.root()).active);
        let mid = tree.node(tree.root()).children[0];
        assert!(tree.node(mid).active);
    }

    #[test]
    fn test_volumic_filtering() {
        let mut tree = ComponentTree::new(&step_row()).unwrap();
        // volumes are 7, 3, 1: keep only the middle node
        tree.volumic_filtering(2, 5);
        let active: Vec<i64> = tree
            .bfs()
            .into_iter()
            .filter(|&n| tree.node(n).active)
            .map(|n| tree.node(n).volume)
            .collect();
        assert_eq!(active, vec![3]);
    }

    #[test]
    fn test_restore_resets_levels() {
        let mut tree = ComponentTree::new(&step_row()).unwrap();
        let mid = tree.node(tree.root()).children[0];
        tree.node_mut(mid).h = 99;
        tree.restore();
        assert_eq!(tree.node(mid).h, tree.node(mid).ori_h);
    }
}
