use serde::{Deserialize, Deserializer, Serialize};

/// Proficiency tier, ordered innermost to outermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Comfortable,
    Challenging,
    Near,
    Far,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Comfortable, Tier::Challenging, Tier::Near, Tier::Far];

    pub fn key(self) -> &'static str {
        match self {
            Tier::Comfortable => "comfortable",
            Tier::Challenging => "challenging",
            Tier::Near => "near",
            Tier::Far => "far",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tier| tier.key() == key)
    }

    pub fn name_cn(self) -> &'static str {
        match self {
            Tier::Comfortable => "舒适区",
            Tier::Challenging => "挑战区",
            Tier::Near => "近不胜任",
            Tier::Far => "远不胜任",
        }
    }

    pub fn name_en(self) -> &'static str {
        match self {
            Tier::Comfortable => "Comfortable",
            Tier::Challenging => "Challenging",
            Tier::Near => "Near Incapable",
            Tier::Far => "Far Incapable",
        }
    }

    /// 1-based position, innermost first.
    pub fn ordinal(self) -> usize {
        match self {
            Tier::Comfortable => 1,
            Tier::Challenging => 2,
            Tier::Near => 3,
            Tier::Far => 4,
        }
    }
}

/// Item labels for each tier of one category.
///
/// Missing or `null` tier arrays deserialize as empty, so a partially
/// specified category is normalized on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comfortable: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub challenging: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub near: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub far: Vec<String>,
}

impl Skills {
    pub fn get(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::Comfortable => &self.comfortable,
            Tier::Challenging => &self.challenging,
            Tier::Near => &self.near,
            Tier::Far => &self.far,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut Vec<String> {
        match tier {
            Tier::Comfortable => &mut self.comfortable,
            Tier::Challenging => &mut self.challenging,
            Tier::Near => &mut self.near,
            Tier::Far => &mut self.far,
        }
    }

    pub fn count(&self, tier: Tier) -> usize {
        self.get(tier).len()
    }

    pub fn total(&self) -> usize {
        Tier::ALL.iter().map(|tier| self.count(*tier)).sum()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default, deserialize_with = "null_skills_as_empty")]
    pub skills: Skills,
}

fn null_skills_as_empty<'de, D>(deserializer: D) -> Result<Skills, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Skills>::deserialize(deserializer)?.unwrap_or_default())
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            skills: Skills::default(),
        }
    }

    pub fn with_items(mut self, tier: Tier, items: &[&str]) -> Self {
        self.skills
            .get_mut(tier)
            .extend(items.iter().map(|item| item.to_string()));
        self
    }
}

/// The whole chart input. Treated as an immutable snapshot by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataModel {
    pub categories: Vec<Category>,
}

impl DataModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_comfortable_items(&self) -> bool {
        self.categories
            .iter()
            .any(|cat| !cat.skills.comfortable.is_empty())
    }

    /// Built-in data set used when nothing was supplied or loading failed.
    pub fn default_data() -> Self {
        let seed: [(&str, [&[&str]; 4]); 8] = [
            (
                "计算机通识",
                [
                    &["数据结构", "计算机网络", "HCI 研究方法"],
                    &["系统设计", "安全合规理解"],
                    &["分布式一致性"],
                    &["操作系统内核"],
                ],
            ),
            (
                "技术栈",
                [
                    &["Python", "C++ 基础", "Git"],
                    &["D3/SVG", "Linux 运维"],
                    &["K8s"],
                    &["内核态开发"],
                ],
            ),
            (
                "前端",
                [
                    &["React", "Tailwind", "TypeScript 基础"],
                    &["性能优化", "Web 安全"],
                    &["WebGL"],
                    &["浏览器内核原理"],
                ],
            ),
            (
                "设计",
                [
                    &["交互流程", "信息架构", "可用性评估"],
                    &["动效设计", "可视化编码"],
                    &["插画"],
                    &["3D 建模"],
                ],
            ),
            (
                "沟通协作",
                [
                    &["跨部门对齐", "需求澄清", "会议纪要"],
                    &["冲突化解", "利益相关人管理"],
                    &["公开演讲"],
                    &["大型路演"],
                ],
            ),
            (
                "科研与写作",
                [
                    &["英文写作", "审稿 rebuttal", "质性编码"],
                    &["实验设计", "量化统计"],
                    &["可重复实验工程化"],
                    &["大型纵向研究组织"],
                ],
            ),
            (
                "产品",
                [
                    &["PRD/里程碑", "竞品分析", "数据闭环"],
                    &["商业化策略", "增长实验"],
                    &["定价模型"],
                    &["生态平台化"],
                ],
            ),
            (
                "运营",
                [
                    &["使用分析", "工单回访", "指标看板"],
                    &["A/B 测试", "风控策略迭代"],
                    &["精细化分层运营"],
                    &["海量多租户运营"],
                ],
            ),
        ];

        let categories = seed
            .iter()
            .map(|(name, tiers)| {
                Tier::ALL
                    .iter()
                    .zip(tiers.iter())
                    .fold(Category::new(*name), |cat, (tier, items)| {
                        cat.with_items(*tier, items)
                    })
            })
            .collect();
        Self { categories }
    }
}
