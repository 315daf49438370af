// src/canonical/tables.rs
// Immutable substitution tables backing diagnosis text canonicalization.
// Loaded once per process; read-only afterwards, safe to share across threads.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Answer separator used when a decision carries more than one canonical name.
pub const ANSWER_SEPARATOR: &str = "##";

/// Descriptive qualifier phrases collapsed to the short stand-ins used by the
/// reference vocabulary. Applied as literal replacements in table order;
/// overlapping replacements are not re-scanned.
pub const PHRASE_SUBSTITUTIONS: [(&str, &str); 6] = [
    ("部位未特指的", "部未指"),
    ("未特指的", "未指"),
    ("原因不明的", "不明"),
    ("意图不确定的", "意不"),
    ("不可归类在他处", "不归他"),
    ("其他特指的疾患", "他特指"),
];

// Greek alphabet, lower case first, then upper case. The reference table stops
// at uppercase psi, so an uppercase omega passes through untouched.
const GREEK_LETTERS: [(char, &str); 47] = [
    ('α', "alpha"),
    ('β', "beta"),
    ('γ', "gamma"),
    ('δ', "delta"),
    ('ε', "epsilon"),
    ('ζ', "zeta"),
    ('η', "eta"),
    ('θ', "theta"),
    ('ι', "iota"),
    ('κ', "kappa"),
    ('λ', "lambda"),
    ('μ', "mu"),
    ('ν', "nu"),
    ('ξ', "xi"),
    ('ο', "omicron"),
    ('π', "pi"),
    ('ρ', "rho"),
    ('σ', "sigma"),
    ('τ', "tau"),
    ('υ', "upsilon"),
    ('φ', "phi"),
    ('χ', "chi"),
    ('ψ', "psi"),
    ('ω', "omega"),
    ('Α', "alpha"),
    ('Β', "beta"),
    ('Γ', "gamma"),
    ('Δ', "delta"),
    ('Ε', "epsilon"),
    ('Ζ', "zeta"),
    ('Η', "eta"),
    ('Θ', "theta"),
    ('Ι', "iota"),
    ('Κ', "kappa"),
    ('Λ', "lambda"),
    ('Μ', "mu"),
    ('Ν', "nu"),
    ('Ξ', "xi"),
    ('Ο', "omicron"),
    ('Π', "pi"),
    ('Ρ', "rho"),
    ('Σ', "sigma"),
    ('Τ', "tau"),
    ('Υ', "upsilon"),
    ('Φ', "phi"),
    ('Χ', "chi"),
    ('Ψ', "psi"),
];

pub static GREEK_MAP: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| GREEK_LETTERS.iter().copied().collect());

// Roman-numeral glyphs and ideographic digits, keyed by the uppercase form of
// the glyph (lowercase glyphs such as 'ⅳ' uppercase onto these keys).
const DIGIT_GLYPHS: [(char, &str); 10] = [
    ('Ⅳ', "iv"),
    ('Ⅲ', "iii"),
    ('Ⅱ', "ii"),
    ('Ⅰ', "i"),
    ('一', "1"),
    ('二', "2"),
    ('三', "3"),
    ('四', "4"),
    ('五', "5"),
    ('六', "6"),
];

pub static DIGIT_MAP: Lazy<HashMap<char, &'static str>> =
    Lazy::new(|| DIGIT_GLYPHS.iter().copied().collect());

/// Lower-case roman numeral runs recognized inside alphabetic tokens.
pub const ROMAN_NUMERALS: [(&str, &str); 8] = [
    ("i", "1"),
    ("ii", "2"),
    ("iii", "3"),
    ("iv", "4"),
    ("v", "5"),
    ("vi", "6"),
    ("vii", "7"),
    ("viii", "8"),
];

pub static ROMAN_MAP: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| ROMAN_NUMERALS.iter().copied().collect());

/// Clinical abbreviations expanded when bounded by non-ASCII-letter
/// characters on both sides. Table order is significant: entries are applied
/// top to bottom against the current state of the string. The fullwidth plus
/// sign is the one entry replaced without boundary checks.
pub const ABBREVIATIONS: [(&str, &str); 190] = [
    ("＋", "+"),
    ("pci", "经皮冠状动脉介入治疗"),
    ("cad", "冠状动脉性心脏病"),
    ("sle", "系统性红斑狼疮"),
    ("loa", "左枕前胎位"),
    ("mp", "支原体"),
    ("ou", "双眼"),
    ("mt", "恶性肿瘤"),
    ("paget", "佩吉特"),
    ("tpsa", "肿瘤标志物"),
    ("tc", "血清总胆固醇"),
    ("pbc", "原发性胆汁型肝硬化"),
    ("fgr", "胎儿生长受限"),
    ("barrett", "巴氏"),
    ("tia", "短暂性脑缺血发作"),
    ("bowen", "鲍恩"),
    ("as", "强直性脊柱炎"),
    ("dic", "弥散性血管内凝血"),
    ("hcc", "肝细胞癌"),
    ("ggo", "肺部阴影"),
    ("cushing", "库欣"),
    ("ln", "狼疮性肾炎"),
    ("prl", "泌乳素"),
    ("copd", "慢性阻塞性肺疾病"),
    ("mia", "微浸润性腺癌"),
    ("cea", "癌胚抗原"),
    ("hpv", "人乳头瘤病毒感染"),
    ("carcinoma", "恶性上皮肿瘤"),
    ("iud", "具有子宫内避孕装置"),
    ("aecopd", "急性加重期慢性阻塞性肺疾病"),
    ("gvhd", "移植物抗宿主病"),
    ("crohn", "克罗恩"),
    ("dixon", "直肠切除术"),
    ("tsh", "促甲状腺激素"),
    ("ptca", "冠状动脉腔内血管成形术"),
    ("ivf", "人工妊娠"),
    ("rop", "早产儿视网膜病"),
    ("avnrt", "房室结折返性心动过速"),
    ("cg", "慢性胃炎"),
    ("avn", "成人股骨头缺血性坏死"),
    ("rca", "右冠状动脉"),
    ("nt", "颈部透明度厚度"),
    ("nerd", "非糜烂性胃食管反流病"),
    ("sonk", "自发性膝关节骨坏死"),
    ("cabg", "冠状动脉搭桥"),
    ("burrkitt", "伯基特"),
    ("chd", "冠状动脉粥样硬化性心脏病"),
    ("hf", "心力衰竭"),
    ("chdhf", "冠心病心力衰竭"),
    ("ep", "癫痫"),
    ("simmond", "西蒙"),
    ("mgd", "睑板腺功能障碍"),
    ("fl", "滤泡性淋巴瘤"),
    ("teson", "特尔松"),
    ("ra", "类风湿性关节炎"),
    ("gd", "毒性弥漫性甲状腺肿"),
    ("poland", "波兰"),
    ("eb", "疱疹病毒"),
    ("msi", "微卫星不稳定"),
    ("pnet", "原始性神经外胚瘤"),
    ("lutembacher", "卢滕巴赫"),
    ("acl", "膝关节前交叉韧带"),
    ("he", "人附睾蛋白"),
    ("vkh", "伏格特-小柳-原田"),
    ("le", "红斑狼疮"),
    ("nyha", "纽约心脏病协会"),
    ("kt", "克利佩尔-特农纳"),
    ("rhcc", "复发性肝癌"),
    ("ige", "免疫球蛋白E"),
    ("poncet", "篷塞"),
    ("lst", "大肠侧向发育型肿瘤"),
    ("cgn", "慢性肾小球肾炎"),
    ("fsgs", "局灶节段性肾小球硬化"),
    ("gdm", "妊娠期糖尿病"),
    ("rsa", "右骶前"),
    ("htn", "高血压"),
    ("ncr", "接近完全缓解"),
    ("hunt", "亨特"),
    ("ddd", "退变性椎间盘病"),
    ("alzheimer", "阿尔茨海默"),
    ("nsclc", "非小细胞肺腺癌"),
    ("evens", "伊文氏"),
    ("mikulicz", "米库利奇"),
    ("ev", "肠病毒"),
    ("igd", "免疫球蛋白D"),
    ("chf", "充血性心力衰竭"),
    ("od", "右眼"),
    ("ipi", "国际预后指数"),
    ("dieulafoy", "迪厄拉富瓦"),
    ("lad", "左前降支"),
    ("ao", "主动脉"),
    ("hoffa", "霍法"),
    ("tunner", "特纳"),
    ("pagtes", "佩吉特"),
    ("killip", "基利普"),
    ("addison", "艾迪生"),
    ("rett", "雷特"),
    ("wernicke", "韦尼克"),
    ("castelman", "卡斯尔曼"),
    ("goldenhar", "戈尔登哈尔"),
    ("ufh", "普通肝素"),
    ("ddh", "发育性髋关节发育不良"),
    ("stevens", "史蒂文斯"),
    ("johnson", "约翰逊"),
    ("athmas", "哮喘"),
    ("rfa", "射频消融"),
    ("kippip", "基利普"),
    ("pancreaticcancer", "胰腺恶性肿瘤"),
    ("srs", "立体定向放射外科"),
    ("ama", "抗线粒体抗体"),
    ("cgd", "慢性肉芽肿病"),
    ("bmt", "骨髓移植"),
    ("sd", "脐带血流比值"),
    ("arnold", "阿诺德"),
    ("tb", "结核感染"),
    ("dvt", "下肢深静脉血栓形成"),
    ("sturge", "斯特奇"),
    ("weber", "韦伯"),
    ("smt", "黏膜下肿瘤"),
    ("ca", "恶性肿瘤"),
    ("smtca", "粘膜下恶性肿瘤"),
    ("nse", "神经元特异性烯醇化酶"),
    ("psvt", "阵发性室上性心动过速"),
    ("gaucher", "戈谢"),
    ("fai", "髋关节撞击综合征"),
    ("lop", "左枕后位"),
    ("lot", "左枕横位"),
    ("pcos", "多囊卵巢综合征"),
    ("sweet", "急性发热性嗜中性皮病"),
    ("graves", "格雷夫斯"),
    ("cdh", "先天性髋关节脱位"),
    ("enneking", "恩内金"),
    ("leep", "利普"),
    ("itp", "特发性血小板减少性紫癜"),
    ("wbc", "白细胞"),
    ("malt", "粘膜相关淋巴样组织"),
    ("naoh", "氢氧化钠"),
    ("fd", "功能性消化不良"),
    ("ck", "肌酸激酶"),
    ("hl", "霍奇金淋巴瘤"),
    ("chb", "慢性乙型肝炎"),
    ("est", "内镜下十二指肠乳头括约肌切开术"),
    ("enbd", "内镜下鼻胆管引流术"),
    ("carolis", "卡罗利斯"),
    ("lam", "淋巴管肌瘤病"),
    ("ptcd", "经皮肝穿刺胆道引流术"),
    ("alk", "间变性淋巴瘤激酶"),
    ("hunter", "亨特"),
    ("pof", "卵巢早衰"),
    ("ems", "子宫内膜异位症"),
    ("asd", "房间隔缺损"),
    ("vsd", "室间隔缺损"),
    ("pda", "动脉导管未闭"),
    ("stills", "斯蒂尔"),
    ("ecog", "东部癌症协作组"),
    ("castlemen", "卡斯尔曼"),
    ("cgvhd", "慢性移植物抗宿主病"),
    ("ards", "急性呼吸窘迫综合征"),
    ("op", "骨质疏松"),
    ("lsa", "左骶前"),
    ("afp", "甲胎蛋白"),
    ("sclc", "小细胞癌"),
    ("ecg", "心电图"),
    ("pdl", "细胞程序性死亡配体"),
    ("mss", "微卫星稳定"),
    ("masson", "马松"),
    ("ms", "多发性硬化"),
    ("tg", "甘油三酯"),
    ("cmt", "腓骨肌萎缩"),
    ("ph", "氢离子浓度指数"),
    ("dlbcl", "弥漫大B细胞淋巴瘤"),
    ("turner", "特纳"),
    ("aml", "急性骨髓系白血病"),
    ("pta", "经皮血管腔内血管成形术"),
    ("alpers", "阿尔珀斯"),
    ("tat", "破伤风抗毒素"),
    ("cavc", "完全性房室间隔缺损"),
    ("coa", "主动脉缩窄"),
    ("ggt", "谷氨酰转肽酶"),
    ("edss", "扩展残疾状态量表"),
    ("vin", "外阴上皮内瘤变"),
    ("vini", "外阴上皮内瘤变1"),
    ("vinii", "外阴上皮内瘤变2"),
    ("viniii", "外阴上皮内瘤变3"),
    ("ebv", "疱疹病毒"),
    ("dcis", "乳腺导管原位癌"),
    ("gu", "胃溃疡"),
    ("terson", "特尔松"),
    ("oa", "骨关节炎"),
    ("cin", "宫颈上皮内瘤变"),
];
