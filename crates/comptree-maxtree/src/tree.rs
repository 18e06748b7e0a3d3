//! Component tree surface
//!
//! [`ComponentTree`] owns the node arena, the input copy, the cropped
//! status image and the per-level node index the builder hands over. All
//! queries resolve through `NodeId` indices; the root is its own parent.

use comptree_core::{Image, Neighborhood, Pixel};

use crate::attributes;
use crate::error::TreeResult;
use crate::flood::Flooder;
use crate::node::{Node, NodeId, bfs_order, merge_pixels};
use crate::options::{AttributeSet, TreeOptions};

/// Max-tree of a grayscale image with per-node attributes.
///
/// Nodes are the connected components of the upper level sets, ordered by
/// inclusion; a min-tree is obtained by building over
/// [`Image::inverted`](comptree_core::Image::inverted).
///
/// # Examples
///
/// ```
/// use comptree_core::Image;
/// use comptree_maxtree::ComponentTree;
///
/// let img = Image::from_vec_2d(3, 3, vec![0u8, 0, 0, 0, 5, 0, 0, 0, 0]).unwrap();
/// let tree = ComponentTree::new(&img).unwrap();
/// assert_eq!(tree.len(), 2);
/// assert_eq!(tree.node(tree.root()).area, 9);
/// ```
#[derive(Debug, Clone)]
pub struct ComponentTree<T: Pixel> {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) image: Image<T>,
    status: Image<i32>,
    level_index: Vec<Vec<NodeId>>,
    h_min: i64,
    h_max: i64,
}

impl<T: Pixel> ComponentTree<T> {
    /// Build with the default 8-connected 2D neighborhood and the standard
    /// attribute bundle.
    pub fn new(image: &Image<T>) -> TreeResult<Self> {
        Self::with_options(image, &Neighborhood::n8_2d(), &TreeOptions::default())
    }

    /// Build with an explicit connectivity and the standard bundle.
    pub fn with_neighborhood(image: &Image<T>, connexity: &Neighborhood) -> TreeResult<Self> {
        Self::with_options(image, connexity, &TreeOptions::default())
    }

    /// Build with MSER stability analysis at step `delta`.
    pub fn with_delta(image: &Image<T>, connexity: &Neighborhood, delta: u32) -> TreeResult<Self> {
        let opts = TreeOptions::new()
            .with_attributes(AttributeSet::stability())
            .with_delta(delta);
        Self::with_options(image, connexity, &opts)
    }

    /// Build computing only the selected bundles; `delta` doubles as the
    /// default ring radius when OTSU is selected.
    pub fn with_attributes(
        image: &Image<T>,
        connexity: &Neighborhood,
        attributes: AttributeSet,
        delta: u32,
    ) -> TreeResult<Self> {
        let opts = TreeOptions::new()
            .with_attributes(attributes)
            .with_delta(delta);
        Self::with_options(image, connexity, &opts)
    }

    /// Build with fully explicit options.
    pub fn with_options(
        image: &Image<T>,
        connexity: &Neighborhood,
        opts: &TreeOptions,
    ) -> TreeResult<Self> {
        let mut flooder = Flooder::new(image, connexity)?;
        flooder.compute_tree();
        flooder.compute_attributes(opts)?;

        let status = flooder.cropped_status()?;
        let level_index = flooder.level_index();
        Ok(ComponentTree {
            nodes: flooder.nodes,
            root: flooder.root,
            image: image.clone(),
            status,
            level_index,
            h_min: flooder.h_min,
            h_max: flooder.h_max,
        })
    }

    /// Root node id; the only node that is its own parent.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A built tree always has at least the root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Immutable node access.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Mutable node access. Structural fields (`parent`, `children`,
    /// `pixels`) are part of the tree invariants; callers normally only
    /// touch `active` and the attribute slots.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    /// The whole arena.
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Minimum input level.
    #[inline]
    pub fn h_min(&self) -> i64 {
        self.h_min
    }

    /// Maximum input level.
    #[inline]
    pub fn h_max(&self) -> i64 {
        self.h_max
    }

    /// The image the tree was built over.
    #[inline]
    pub fn image(&self) -> &Image<T> {
        &self.image
    }

    /// Per-pixel node labels within each pixel's level, cropped to the
    /// original shape.
    #[inline]
    pub fn status(&self) -> &Image<i32> {
        &self.status
    }

    /// Nodes discovered at `level - h_min`, in discovery order.
    pub fn nodes_at_level(&self, level: i64) -> &[NodeId] {
        let idx = (level - self.h_min) as usize;
        match self.level_index.get(idx) {
            Some(ids) => ids,
            None => &[],
        }
    }

    /// Breadth-first order from the root.
    pub fn bfs(&self) -> Vec<NodeId> {
        bfs_order(&self.nodes, self.root)
    }

    /// All pixel offsets of a subtree.
    pub fn merge_pixels(&self, start: NodeId) -> Vec<usize> {
        merge_pixels(&self.nodes, start)
    }

    /// Pixel offsets of the connected chain of inactive nodes hanging from
    /// `start`; traversal stops at active nodes.
    pub fn merge_false_pixels(&self, start: NodeId) -> Vec<usize> {
        let mut pixels = Vec::new();
        let mut fifo = std::collections::VecDeque::from([start]);
        while let Some(n) = fifo.pop_front() {
            if self.nodes[n].active {
                continue;
            }
            pixels.extend_from_slice(&self.nodes[n].pixels);
            fifo.extend(self.nodes[n].children.iter().copied());
        }
        pixels
    }

    /// Offset-to-node map over the original image.
    pub fn node_index(&self) -> Vec<NodeId> {
        let mut index = vec![self.root; self.image.len()];
        for n in self.bfs() {
            for &off in &self.nodes[n].pixels {
                index[off] = n;
            }
        }
        index
    }

    /// Node owning the pixel at a linear offset, resolved through the
    /// status image in constant time.
    pub fn node_at_offset(&self, offset: usize) -> Option<NodeId> {
        if offset >= self.image.len() {
            return None;
        }
        let level = (self.image.at(offset).to_i64() - self.h_min) as usize;
        let label = self.status.at(offset);
        self.level_index
            .get(level)
            .and_then(|ids| ids.get(label as usize))
            .copied()
    }

    /// Node owning the pixel at `(x, y, z)`.
    pub fn node_at(&self, x: u32, y: u32, z: u32) -> Option<NodeId> {
        if !self.image.contains(i64::from(x), i64::from(y), i64::from(z)) {
            return None;
        }
        self.node_at_offset(self.image.offset_of(x, y, z))
    }

    /// Recompute the neighborhood-ring statistics with an explicit radius.
    pub fn ring_statistics(&mut self, radius: u32) -> TreeResult<()> {
        attributes::ring_statistics(&mut self.nodes, self.root, &self.image, radius)
    }
}
