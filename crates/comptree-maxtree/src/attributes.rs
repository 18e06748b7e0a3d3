//! Attribute engine
//!
//! Attributes are computed in a fixed dependency order over the finished
//! arena. The bottom-up recurrences (area, sums, contrast, volume,
//! descendant counts, bounding boxes) iterate a reverse BFS order, which
//! visits every child before its parent. The contour scan is a single pass
//! over the bordered workspace; the ring statistics walk the original
//! image with a reusable boolean mask.
//!
//! Division-free defaults: slots that a pass does not touch keep the
//! neutral values set at node creation (`+inf` for the stability scores,
//! zeros elsewhere).

use std::f64::consts::PI;

use comptree_core::{Image, Neighborhood, Pixel};

use crate::error::TreeResult;
use crate::flood::{BORDER_STATUS, Flooder};
use crate::node::{Node, NodeId, bfs_order, merge_pixels};
use crate::options::{AttributeSet, TreeOptions};

impl<T: Pixel> Flooder<'_, T> {
    /// Compute the selected attribute bundles.
    ///
    /// Dependencies are resolved first, so e.g. requesting only
    /// [`AttributeSet::OTSU`] still yields areas, subtree sums and the
    /// ring statistics it is defined over.
    pub fn compute_attributes(&mut self, opts: &TreeOptions) -> TreeResult<()> {
        let set = opts.attributes.resolved();
        let order = bfs_order(&self.nodes, self.root);

        if set.contains(AttributeSet::AREA) {
            self.accumulate_areas(&order);

            if set.contains(AttributeSet::OTSU) {
                ring_statistics(
                    &mut self.nodes,
                    self.root,
                    self.image,
                    opts.ring_radius(),
                )?;
                self.accumulate_sums(&order);
                self.compute_mean_variance(&order);
                self.compute_otsu(&order);
            }
        }
        if set.contains(AttributeSet::AREA_DERIVATIVES) {
            self.compute_area_derivatives(&order);
            self.compute_area_derivative_gaps(&order);
            self.compute_mser(&order, opts.delta);
        }
        if set.contains(AttributeSet::CONTRAST) {
            self.compute_contrast(&order);
        }
        if set.contains(AttributeSet::VOLUME) {
            self.compute_volume(&order);
        }
        if set.contains(AttributeSet::BORDER_GRADIENT) {
            self.scan_contours(true);
            self.compute_border_gradient(&order)?;
        }
        if set.contains(AttributeSet::COMPLEXITY) {
            if !set.contains(AttributeSet::BORDER_GRADIENT) {
                self.scan_contours(false);
            }
            self.compute_complexity(&order);
        }
        if set.contains(AttributeSet::BOUNDING_BOX) {
            self.union_bounding_boxes(&order);
        }
        if set.contains(AttributeSet::SUB_NODES) {
            self.count_sub_nodes(&order);
        }
        Ok(())
    }

    /// `area(n) = |pixels(n)| + sum of children`; the local count was
    /// accumulated during flooding.
    fn accumulate_areas(&mut self, order: &[NodeId]) {
        for &n in order.iter().rev() {
            for i in 0..self.nodes[n].children.len() {
                let c = self.nodes[n].children[i];
                self.nodes[n].area += self.nodes[c].area;
            }
        }
    }

    fn accumulate_sums(&mut self, order: &[NodeId]) {
        for &n in order.iter().rev() {
            for i in 0..self.nodes[n].children.len() {
                let c = self.nodes[n].children[i];
                self.nodes[n].sum += self.nodes[c].sum;
                self.nodes[n].sum_sq += self.nodes[c].sum_sq;
            }
        }
    }

    fn compute_mean_variance(&mut self, order: &[NodeId]) {
        for &n in order {
            let node = &mut self.nodes[n];
            let area = node.area as f64;
            node.mean = node.sum as f64 / area;
            node.variance = node.sum_sq as f64 / area - node.mean * node.mean;
        }
    }

    fn compute_otsu(&mut self, order: &[NodeId]) {
        for &n in order {
            let node = &mut self.nodes[n];
            let gap = node.mean - node.ring_mean;
            node.otsu = gap * gap / (node.variance + node.ring_variance);
        }
    }

    /// `contrast(n) = max over children of (child.h - h) + contrast(child)`.
    fn compute_contrast(&mut self, order: &[NodeId]) {
        for &n in order.iter().rev() {
            let mut best = 0;
            for i in 0..self.nodes[n].children.len() {
                let c = self.nodes[n].children[i];
                best = best.max(self.nodes[c].h - self.nodes[n].h + self.nodes[c].contrast);
            }
            self.nodes[n].contrast = best;
        }
    }

    /// `volume(n) = area * (h - parent.h) + sum of children`; the root uses
    /// its own level so the tree total equals the sum of all intensities.
    fn compute_volume(&mut self, order: &[NodeId]) {
        for &n in order.iter().rev() {
            let step = if self.nodes[n].parent == n {
                self.nodes[n].h
            } else {
                self.nodes[n].h - self.nodes[self.nodes[n].parent].h
            };
            let mut volume = self.nodes[n].area * step;
            for i in 0..self.nodes[n].children.len() {
                let c = self.nodes[n].children[i];
                volume += self.nodes[c].volume;
            }
            self.nodes[n].volume = volume;
        }
    }

    fn count_sub_nodes(&mut self, order: &[NodeId]) {
        for &n in order.iter().rev() {
            let mut count = self.nodes[n].children.len() as i64;
            for i in 0..self.nodes[n].children.len() {
                let c = self.nodes[n].children[i];
                count += self.nodes[c].sub_nodes;
            }
            self.nodes[n].sub_nodes = count;
        }
    }

    /// First-order area derivatives along the parent link. The root has no
    /// level step above it; its slots keep their neutral defaults.
    fn compute_area_derivatives(&mut self, order: &[NodeId]) {
        for &n in order {
            let parent = self.nodes[n].parent;
            if parent == n {
                continue;
            }
            let shed = (self.nodes[parent].area - self.nodes[n].area) as f64;
            let step = (self.nodes[n].h - self.nodes[parent].h) as f64;
            let area = self.nodes[n].area as f64;
            let node = &mut self.nodes[n];
            node.area_deriv_h = shed / step;
            node.area_deriv_norm = shed / area;
            node.area_deriv_norm_h = shed / step / area;
        }
    }

    fn compute_area_derivative_gaps(&mut self, order: &[NodeId]) {
        for &n in order {
            let parent = self.nodes[n].parent;
            if parent == n {
                continue;
            }
            self.nodes[n].area_deriv_norm_h_deriv =
                self.nodes[parent].area_deriv_norm_h - self.nodes[n].area_deriv_norm_h;
        }
    }

    /// Walk each node's ancestor chain until the level gap reaches `delta`
    /// or the next step would land on the root. Nodes without a Δ-ancestor
    /// keep `+inf` stability.
    fn compute_mser(&mut self, order: &[NodeId], delta: u32) {
        let delta = i64::from(delta);
        for &n in order {
            let h_node = self.nodes[n].h;
            let area_node = self.nodes[n].area;

            let mut cur = n;
            loop {
                if h_node - self.nodes[cur].h >= delta {
                    break;
                }
                let parent = self.nodes[cur].parent;
                if parent == self.nodes[parent].parent {
                    break;
                }
                cur = parent;
            }

            if h_node - self.nodes[cur].h >= delta {
                let area_up = self.nodes[cur].area;
                let h_up = self.nodes[cur].h;
                let grown = (area_up - area_node) as f64;
                let node = &mut self.nodes[n];
                node.mser = grown / area_node as f64;
                node.area_deriv_delta_h = grown / (h_node - h_up) as f64;
                node.area_deriv_delta_norm = grown / area_up as f64;
            }
        }
    }

    /// One pass over the bordered workspace. A pixel is a contour pixel
    /// when some neighbor is strictly darker or is padding; padding hits
    /// propagate to the root (the frame counts as contour down to the
    /// global minimum), darker neighbors propagate up to the first
    /// ancestor at or below the darkest neighbor level.
    fn scan_contours(&mut self, save_pixels: bool) {
        for off in 0..self.im_border.len() {
            if self.status.at(off) == BORDER_STATUS {
                continue;
            }
            let v = self.im_border.at(off).to_i64();

            let mut contour = false;
            let mut hits_border = false;
            let mut min_value = i64::MAX;
            for &d in self.se.offsets() {
                let q = (off as isize + d) as usize;
                if self.status.at(q) != BORDER_STATUS {
                    let qv = self.im_border.at(q).to_i64();
                    if qv < v {
                        contour = true;
                        min_value = min_value.min(qv);
                    }
                } else {
                    contour = true;
                    hits_border = true;
                    min_value = self.h_min;
                }
            }
            if !contour {
                continue;
            }

            let level = self.level_of(v);
            let label = self.status.at(off) as usize;
            let mut cur = self.index[level][label].expect("assigned pixel resolves to a node");
            let saved = if save_pixels {
                Some(self.image_offset(off))
            } else {
                None
            };

            if hits_border {
                loop {
                    self.nodes[cur].contour_length += 1;
                    if let Some(im_off) = saved {
                        self.nodes[cur].border_pixels.push(im_off);
                    }
                    if cur == self.nodes[cur].parent {
                        break;
                    }
                    cur = self.nodes[cur].parent;
                }
            } else {
                while self.nodes[cur].h > min_value {
                    self.nodes[cur].contour_length += 1;
                    if let Some(im_off) = saved {
                        self.nodes[cur].border_pixels.push(im_off);
                    }
                    cur = self.nodes[cur].parent;
                }
            }
        }
    }

    /// Average of the morphological gradient over each node's recorded
    /// contour pixels.
    fn compute_border_gradient(&mut self, order: &[NodeId]) -> TreeResult<()> {
        let grad = comptree_morph::gradient(self.image, &self.connexity)?;
        for &n in order {
            let node = &mut self.nodes[n];
            if node.border_pixels.is_empty() {
                continue;
            }
            let sum: f64 = node
                .border_pixels
                .iter()
                .map(|&off| grad.at(off).to_i64() as f64)
                .sum();
            node.border_gradient_mean = sum / node.border_pixels.len() as f64;
        }
        Ok(())
    }

    fn compute_complexity(&mut self, order: &[NodeId]) {
        for &n in order {
            let node = &mut self.nodes[n];
            if node.area != 0 {
                node.complexity = (1000.0 * node.contour_length as f64 / node.area as f64) as i64;
            }
            node.compactness = if node.contour_length != 0 {
                let contour = node.contour_length as f64;
                (4.0 * PI * node.area as f64 / (contour * contour) * 1000.0) as i64
            } else {
                0
            };
        }
    }

    /// Reverse topological pass: fold every node's box into its parent's.
    fn union_bounding_boxes(&mut self, order: &[NodeId]) {
        for &n in order.iter().rev() {
            let parent = self.nodes[n].parent;
            if parent == n {
                continue;
            }
            let (xmin, xmax, ymin, ymax, zmin, zmax) = {
                let b = &self.nodes[n];
                (b.xmin, b.xmax, b.ymin, b.ymax, b.zmin, b.zmax)
            };
            let p = &mut self.nodes[parent];
            p.xmin = p.xmin.min(xmin);
            p.xmax = p.xmax.max(xmax);
            p.ymin = p.ymin.min(ymin);
            p.ymax = p.ymax.max(ymax);
            p.zmin = p.zmin.min(zmin);
            p.zmax = p.zmax.max(zmax);
        }
    }
}

/// Neighborhood-ring statistics: for every node, the pixels within a
/// Euclidean ball of the subtree but not inside it. Each ring pixel is
/// consumed once per node via the scratch mask, which is reset between
/// nodes.
pub(crate) fn ring_statistics<T: Pixel>(
    nodes: &mut [Node],
    root: NodeId,
    image: &Image<T>,
    radius: u32,
) -> TreeResult<()> {
    let ball = Neighborhood::euclidean_ball_2d(radius);
    let mut open = Image::<bool>::new(image.width(), image.height(), image.depth())?;

    for n in bfs_order(nodes, root) {
        open.fill(true);
        let pixels = merge_pixels(nodes, n);
        for &off in &pixels {
            open.set_at(off, false);
        }

        let mut ring_area = 0i64;
        let mut ring_sum = 0i64;
        let mut ring_sum_sq = 0i64;
        for &off in &pixels {
            let (x, y, z) = image.coord_of(off);
            for pt in ball.points() {
                let qx = i64::from(x) + i64::from(pt[0]);
                let qy = i64::from(y) + i64::from(pt[1]);
                let qz = i64::from(z) + i64::from(pt[2]);
                if !image.contains(qx, qy, qz) {
                    continue;
                }
                let q = image.offset_of(qx as u32, qy as u32, qz as u32);
                if open.at(q) {
                    let qv = image.at(q).to_i64();
                    ring_area += 1;
                    ring_sum += qv;
                    ring_sum_sq += qv * qv;
                    open.set_at(q, false);
                }
            }
        }

        let node = &mut nodes[n];
        node.ring_area = ring_area;
        node.ring_sum = ring_sum;
        node.ring_sum_sq = ring_sum_sq;
        if ring_area > 0 {
            node.ring_mean = ring_sum as f64 / ring_area as f64;
            node.ring_variance =
                ring_sum_sq as f64 / ring_area as f64 - node.ring_mean * node.ring_mean;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use comptree_core::Image;

    use crate::options::{AttributeSet, TreeOptions};
    use crate::tree::ComponentTree;

    fn peak() -> Image<u8> {
        Image::from_vec_2d(3, 3, vec![0, 0, 0, 0, 5, 0, 0, 0, 0]).expect("valid fixture")
    }

    fn step_row() -> Image<u8> {
        Image::from_vec_2d(4, 1, vec![1, 1, 2, 3]).expect("valid fixture")
    }

    #[test]
    fn test_constant_image_attributes() {
        let mut img = Image::<u8>::new_2d(3, 3).unwrap();
        img.fill(7);
        let tree = ComponentTree::new(&img).unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.area, 9);
        assert_eq!(root.contrast, 0);
        assert_eq!(root.volume, 63);
        assert_eq!(root.sub_nodes, 0);
        // every frame pixel sees padding, the center sees only equals
        assert_eq!(root.contour_length, 8);
    }

    #[test]
    fn test_peak_attributes() {
        let tree = ComponentTree::new(&peak()).unwrap();
        let root = tree.node(tree.root());
        let child = tree.node(root.children[0]);

        assert_eq!(root.contrast, 5);
        assert_eq!(child.contrast, 0);
        // root level is 0, so the tree volume is the intensity total
        assert_eq!(root.volume, 5);
        assert_eq!(child.volume, 5);
        assert_eq!(root.sub_nodes, 1);

        assert_eq!(
            (child.xmin, child.xmax, child.ymin, child.ymax, child.zmin, child.zmax),
            (1, 1, 1, 1, 0, 0)
        );
        assert_eq!((root.xmin, root.xmax, root.ymin, root.ymax), (0, 2, 0, 2));
    }

    #[test]
    fn test_peak_contour_and_shape_scores() {
        let tree = ComponentTree::new(&peak()).unwrap();
        let root = tree.node(tree.root());
        let child = tree.node(root.children[0]);

        // 2(W+H)-4 frame pixels hit the padding
        assert_eq!(root.contour_length, 8);
        assert_eq!(child.contour_length, 1);

        assert_eq!(child.complexity, 1000);
        // 4π * 1 / 1 * 1000, truncated
        assert_eq!(child.compactness, 12566);
        assert_eq!(root.complexity, 1000 * 8 / 9);
    }

    #[test]
    fn test_step_row_attributes() {
        let tree = ComponentTree::new(&step_row()).unwrap();
        let root = tree.node(tree.root());
        let mid = tree.node(root.children[0]);
        let top = tree.node(mid.children[0]);

        assert_eq!([root.contrast, mid.contrast, top.contrast], [2, 1, 0]);
        assert_eq!([root.volume, mid.volume, top.volume], [7, 3, 1]);
        // a 4x1 strip is all frame; every pixel propagates to the root
        assert_eq!(root.contour_length, 4);
        assert_eq!(mid.contour_length, 2);
        assert_eq!(top.contour_length, 1);
    }

    #[test]
    fn test_mser_and_derivatives() {
        let nb = comptree_core::Neighborhood::n8_2d();
        let tree = ComponentTree::with_delta(&step_row(), &nb, 1).unwrap();
        let root = tree.node(tree.root());
        let mid = tree.node(root.children[0]);
        let top = tree.node(mid.children[0]);

        // top's Δ-ancestor is mid: (2-1)/1
        assert_eq!(top.mser, 1.0);
        assert_eq!(top.area_deriv_delta_h, 1.0);
        assert_eq!(top.area_deriv_delta_norm, 0.5);
        // mid's only strict ancestor is the root, which the walk never uses
        assert!(mid.mser.is_infinite());
        assert!(root.mser.is_infinite());

        // top: parent mid sheds (2-1) pixels over one level
        assert_eq!(top.area_deriv_h, 1.0);
        assert_eq!(top.area_deriv_norm, 1.0);
        assert_eq!(top.area_deriv_norm_h, 1.0);
        // mid: (4-2)/1 / 2
        assert_eq!(mid.area_deriv_h, 2.0);
        assert_eq!(mid.area_deriv_norm, 1.0);
        assert_eq!(mid.area_deriv_norm_h, 0.5);
        assert_eq!(top.area_deriv_norm_h_deriv, 0.5 - 1.0);
    }

    #[test]
    fn test_ring_statistics_peak() {
        let nb = comptree_core::Neighborhood::n8_2d();
        let opts = TreeOptions::new()
            .with_attributes(AttributeSet::OTSU)
            .with_ring_radius(1);
        let tree = ComponentTree::with_options(&peak(), &nb, &opts).unwrap();
        let root = tree.node(tree.root());
        let child = tree.node(root.children[0]);

        // radius-1 ball is the 4-neighborhood of the center pixel
        assert_eq!(child.ring_area, 4);
        assert_eq!(child.ring_mean, 0.0);
        assert_eq!(child.ring_variance, 0.0);
        // the root's subtree is the whole image: no ring left
        assert_eq!(root.ring_area, 0);

        assert_eq!(child.mean, 5.0);
        assert_eq!(child.variance, 0.0);
        // zero variance on both sides: the score is infinite
        assert!(child.otsu.is_infinite());
    }

    #[test]
    fn test_border_gradient() {
        let nb = comptree_core::Neighborhood::n8_2d();
        let opts = TreeOptions::new().with_attributes(AttributeSet::BORDER_GRADIENT);
        let tree = ComponentTree::with_options(&peak(), &nb, &opts).unwrap();
        let root = tree.node(tree.root());
        let child = tree.node(root.children[0]);

        // gradient over the origin-free 8-neighborhood is 0 at the peak
        // itself and 5 on the frame
        assert_eq!(child.border_pixels, vec![4]);
        assert_eq!(child.border_gradient_mean, 0.0);
        assert_eq!(root.border_pixels.len(), 8);
        assert_eq!(root.border_gradient_mean, 5.0);
    }

    #[test]
    fn test_otsu_implies_area() {
        let nb = comptree_core::Neighborhood::n8_2d();
        let tree =
            ComponentTree::with_attributes(&peak(), &nb, AttributeSet::OTSU, 1).unwrap();
        // area was pulled in by dependency resolution
        assert_eq!(tree.node(tree.root()).area, 9);
    }
}
