//! Salembier hierarchical-queue flooding
//!
//! Builds the max-tree in a single pass over a border-padded copy of the
//! input. One FIFO per intensity level forms the hierarchical queue; a
//! parallel status image tracks, for every cell, whether it is padding,
//! unvisited, queued, or already assigned (in which case it holds the
//! per-level label of its node).
//!
//! The classic formulation floods recursively along strictly increasing
//! levels. Recursion depth is bounded by the number of levels, which is
//! fine for 8-bit data but uncomfortably deep for 16-bit, so the recursion
//! runs on an explicit frame stack: a frame is a level plus the pixel and
//! neighbor cursor it was paused at. Frame transitions mirror the
//! recursive procedure exactly, including the repeated re-flood of a
//! brighter level until it drains back down to the caller's level.

use std::collections::VecDeque;

use comptree_core::{Image, Neighborhood, Pixel};
use log::debug;

use crate::error::{TreeError, TreeResult};
use crate::node::{Node, NodeId};

/// Status value for a cell that has not been queued yet.
pub(crate) const ACTIVE: i32 = -1;
/// Status value for a queued, not yet assigned cell.
pub(crate) const NOT_ACTIVE: i32 = -2;
/// Status value for border padding; never queued, never assigned.
pub(crate) const BORDER_STATUS: i32 = -3;

/// Upper bound on the dense queue; 16-bit data needs 65536 levels, anything
/// far beyond that indicates a misuse of the dense representation.
const MAX_LEVELS: u64 = 1 << 20;

/// One paused invocation of the flood procedure.
struct Frame {
    level: usize,
    /// Pixel being scanned and the next displacement index, when the frame
    /// was interrupted by a brighter neighbor.
    resume: Option<(usize, usize)>,
}

/// Flooding workspace: bordered copies, hierarchical queue, per-level
/// bookkeeping and the node arena being grown.
pub(crate) struct Flooder<'a, T: Pixel> {
    pub image: &'a Image<T>,
    pub connexity: Neighborhood,
    pub im_border: Image<T>,
    pub status: Image<i32>,
    /// Connexity bound to the bordered shape.
    pub se: Neighborhood,
    pub back: [u32; 3],
    pub front: [u32; 3],
    pub h_min: i64,
    pub h_max: i64,
    pub levels: usize,
    hq: Vec<VecDeque<usize>>,
    number_nodes: Vec<u32>,
    node_at_level: Vec<bool>,
    /// `index[level][label]` resolves the label-th node discovered at a
    /// level; sized from the level histogram.
    pub index: Vec<Vec<Option<NodeId>>>,
    pub nodes: Vec<Node>,
    pub root: NodeId,
}

impl<'a, T: Pixel> Flooder<'a, T> {
    pub fn new(image: &'a Image<T>, connexity: &Neighborhood) -> TreeResult<Self> {
        if connexity.is_empty() {
            return Err(TreeError::EmptyNeighborhood);
        }

        let h_min = image.min_value().to_i64();
        let h_max = image.max_value().to_i64();
        let levels_wide = (h_max - h_min + 1) as u64;
        if levels_wide > MAX_LEVELS {
            return Err(TreeError::LevelRangeTooLarge {
                levels: levels_wide,
            });
        }
        let levels = levels_wide as usize;

        let back = connexity.negative_extents();
        let front = connexity.positive_extents();

        let im_border = image.add_borders(back, front, T::MIN)?;
        let mut status = Image::<i32>::new(image.width(), image.height(), image.depth())?;
        status.fill(ACTIVE);
        let status = status.add_borders(back, front, BORDER_STATUS)?;

        let mut se = connexity.clone();
        se.bind_to(&im_border);

        // pre-size each level's node index from the level population
        let mut histo = vec![0usize; levels];
        for &v in image.data() {
            histo[(v.to_i64() - h_min) as usize] += 1;
        }
        let index = histo.iter().map(|&n| vec![None; n]).collect();

        Ok(Flooder {
            image,
            connexity: connexity.clone(),
            im_border,
            status,
            se,
            back,
            front,
            h_min,
            h_max,
            levels,
            hq: vec![VecDeque::new(); levels],
            number_nodes: vec![0; levels],
            node_at_level: vec![false; levels],
            index,
            nodes: Vec::new(),
            root: 0,
        })
    }

    /// Flood the whole image, seeding from the first unvisited cell at the
    /// global minimum level.
    pub fn compute_tree(&mut self) {
        let seed = (0..self.im_border.len()).find(|&off| {
            self.status.at(off) == ACTIVE && self.im_border.at(off).to_i64() == self.h_min
        });
        if let Some(off) = seed {
            self.hq[0].push_back(off);
            self.node_at_level[0] = true;
            self.flood(0);
        }
        self.root = self.index[0][0].expect("flooding creates the root at the minimum level");
        debug!(
            "component tree built: {} nodes over {} levels",
            self.nodes.len(),
            self.levels
        );
    }

    /// The flood procedure on an explicit frame stack.
    fn flood(&mut self, start: usize) {
        let mut stack = vec![Frame {
            level: start,
            resume: None,
        }];

        while !stack.is_empty() {
            let fi = stack.len() - 1;
            let level = stack[fi].level;

            let (p, first) = match stack[fi].resume.take() {
                Some(paused) => paused,
                None => match self.hq[level].pop_front() {
                    Some(p) => {
                        self.assign(level, p);
                        (p, 0)
                    }
                    None => {
                        // the level drained: one component is complete
                        let m = self.close_level(level);
                        stack.pop();
                        if let Some(caller) = stack.last() {
                            debug_assert!(m >= caller.level as i64);
                            // keep re-flooding until the drain reaches the
                            // caller's level
                            if m >= 0 && m as usize != caller.level {
                                stack.push(Frame {
                                    level: m as usize,
                                    resume: None,
                                });
                            }
                        }
                        continue;
                    }
                },
            };

            let mut k = first;
            while k < self.se.offsets().len() {
                let q = (p as isize + self.se.offsets()[k]) as usize;
                k += 1;
                if self.status.at(q) == ACTIVE {
                    let ql = (self.im_border.at(q).to_i64() - self.h_min) as usize;
                    self.hq[ql].push_back(q);
                    self.status.set_at(q, NOT_ACTIVE);
                    self.node_at_level[ql] = true;
                    if ql > level {
                        // a brighter neighbor preempts the rest of p's scan;
                        // the paused frame resumes once that level drains
                        stack[fi].resume = Some((p, k));
                        stack.push(Frame {
                            level: ql,
                            resume: None,
                        });
                        break;
                    }
                }
            }
        }
    }

    /// Pop-time bookkeeping: label the cell, materialize its node, fold the
    /// pixel into the node's running attributes.
    fn assign(&mut self, level: usize, p: usize) {
        let label = self.number_nodes[level] as usize;
        self.status.set_at(p, label as i32);
        let id = match self.index[level][label] {
            Some(id) => id,
            None => {
                let id = self.new_node(level);
                self.index[level][label] = Some(id);
                id
            }
        };
        self.update_attributes(id, p);
    }

    /// A component at `level` just drained. Link it under the nearest
    /// shallower level still being flooded, or close the root. Returns the
    /// parent level, or -1 at the root.
    fn close_level(&mut self, level: usize) -> i64 {
        self.number_nodes[level] += 1;

        let mut m = level as i64 - 1;
        while m >= 0 && !self.node_at_level[m as usize] {
            m -= 1;
        }

        if m >= 0 {
            let child_label = (self.number_nodes[level] - 1) as usize;
            let child = self.index[level][child_label].expect("closed component owns a node");
            let parent_level = m as usize;
            let parent_label = self.number_nodes[parent_level] as usize;
            let parent = match self.index[parent_level][parent_label] {
                Some(id) => id,
                None => {
                    let id = self.new_node(parent_level);
                    self.index[parent_level][parent_label] = Some(id);
                    id
                }
            };
            self.nodes[child].parent = parent;
            self.nodes[parent].children.push(child);
        } else {
            let root = self.index[0][0].expect("root node exists at the minimum level");
            self.nodes[root].parent = root;
        }

        self.node_at_level[level] = false;
        m
    }

    fn new_node(&mut self, level: usize) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(id, self.h_min + level as i64));
        id
    }

    /// Fold one bordered-image cell into its node: pixel list (translated
    /// back to the original image), area, running sums, bounding box.
    fn update_attributes(&mut self, id: NodeId, border_off: usize) {
        let (bx, by, bz) = self.im_border.coord_of(border_off);
        let (x, y, z) = (bx - self.back[0], by - self.back[1], bz - self.back[2]);
        let im_off = self.image.offset_of(x, y, z);

        let node = &mut self.nodes[id];
        node.pixels.push(im_off);
        node.area += 1;
        node.sum += node.h;
        node.sum_sq += node.h * node.h;

        node.xmin = node.xmin.min(i64::from(x));
        node.xmax = node.xmax.max(i64::from(x));
        node.ymin = node.ymin.min(i64::from(y));
        node.ymax = node.ymax.max(i64::from(y));
        node.zmin = node.zmin.min(i64::from(z));
        node.zmax = node.zmax.max(i64::from(z));
    }

    /// Translate a bordered-image offset to the original image's offset.
    pub(crate) fn image_offset(&self, border_off: usize) -> usize {
        let (bx, by, bz) = self.im_border.coord_of(border_off);
        self.image.offset_of(
            bx - self.back[0],
            by - self.back[1],
            bz - self.back[2],
        )
    }

    pub(crate) fn level_of(&self, v: i64) -> usize {
        (v - self.h_min) as usize
    }

    /// Per-level node lists in discovery order, for the finished tree.
    pub(crate) fn level_index(&self) -> Vec<Vec<NodeId>> {
        self.index
            .iter()
            .enumerate()
            .map(|(level, slots)| {
                slots[..self.number_nodes[level] as usize]
                    .iter()
                    .copied()
                    .map(|slot| slot.expect("every counted component owns a node"))
                    .collect()
            })
            .collect()
    }

    /// Status image cropped back to the original shape.
    pub(crate) fn cropped_status(&self) -> TreeResult<Image<i32>> {
        Ok(self.status.remove_borders(self.back, self.front)?)
    }
}
